//! Claim a handful of IDs synchronously, then the same shapes asynchronously.
//!
//! Run with: `cargo run --example basic`

use turboflake::{MachineIdLcg, Turboflake, TurboflakeAsyncTokioExt, TurboflakeId};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Two explicit lanes: per-tick capacity doubles compared to one lane.
    let generator = Turboflake::new([0x1337, 0xCAFE]).unwrap();
    println!("engine: {generator}");

    for id in generator.iter().take(3) {
        println!("sync   {id} = {id:?}");
    }

    let batch = generator.next_ids(5);
    println!("batch  {} IDs, first {}", batch.len(), batch[0]);

    let id = generator.next_id_async().await;
    println!("async  {id}");

    // Lanes can also come straight from the full-period LCG: the first n
    // draws are guaranteed distinct.
    let lcg = MachineIdLcg::new(42);
    let wide = Turboflake::new(lcg.take(64)).unwrap();
    let id: TurboflakeId = wide.next_id();
    println!("wide   {id} (64 lanes, machine {})", id.machine_id());
}
