//! Slot Pool Demo
//!
//! A tiny fixed-size object pool whose free list is a `FixedBitVector`.
//! Worker threads check slots out and back in; the bit vector guarantees no
//! two workers ever hold the same slot.
//!
//! Run with logging:
//!
//! ```text
//! RUST_LOG=slotbits=trace cargo run --example slot_pool
//! ```

use anyhow::{bail, Context, Result};
use slotbits::{BitVectorConfig, FixedBitVector};
use std::sync::Arc;
use std::thread;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Number of pooled buffers
const POOL_SIZE: usize = 48;

/// Number of worker threads
const NUM_WORKERS: usize = 4;

/// Checkouts per worker
const ROUNDS: usize = 25;

struct BufferPool {
    in_use: FixedBitVector,
    buffers: Vec<parking_lot::Mutex<Vec<u8>>>,
}

impl BufferPool {
    fn new(size: usize) -> Result<Self> {
        let config = BitVectorConfig::new(size, 0).with_label("buffer-pool");
        let in_use = FixedBitVector::from_config(&config).context("building slot map")?;
        let buffers = (0..size)
            .map(|_| parking_lot::Mutex::new(Vec::with_capacity(64)))
            .collect();
        Ok(Self { in_use, buffers })
    }

    fn checkout(&self) -> Option<usize> {
        self.in_use.get_and_set_first_zero()
    }

    fn checkin(&self, slot: usize) -> Result<()> {
        if self.in_use.test_and_clear(slot)? == 0 {
            bail!("slot {} returned twice", slot);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pool = Arc::new(BufferPool::new(POOL_SIZE)?);

    let handles: Vec<_> = (0..NUM_WORKERS)
        .map(|worker| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || -> Result<usize> {
                let mut served = 0;
                for round in 0..ROUNDS {
                    let Some(slot) = pool.checkout() else {
                        continue;
                    };
                    pool.buffers[slot].lock().push((worker * ROUNDS + round) as u8);
                    pool.checkin(slot)?;
                    served += 1;
                }
                Ok(served)
            })
        })
        .collect();

    let mut total = 0;
    for handle in handles {
        total += handle
            .join()
            .map_err(|_| anyhow::anyhow!("worker panicked"))??;
    }

    info!(total, ones = pool.in_use.count_ones(), "all workers finished");
    println!("Served {} checkouts across {} workers", total, NUM_WORKERS);
    println!("Slot map after run: {}", pool.in_use.to_hex_string());

    Ok(())
}
