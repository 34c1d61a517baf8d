//! Uniform sampling of students without replacement

use rand::seq::index;
use rand::Rng;

use crate::error::{Error, Result};
use crate::roster::Roster;

/// Pick exactly `count` distinct entries of `pool`, uniformly at random
///
/// The returned order is sampling order and carries no meaning.
///
/// # Errors
///
/// Returns `Error::InsufficientPool` when `count` exceeds the pool size
pub fn pick<R: Rng + ?Sized>(pool: &Roster, count: usize, rng: &mut R) -> Result<Vec<String>> {
    if count > pool.len() {
        return Err(Error::InsufficientPool {
            requested: count,
            available: pool.len(),
        });
    }

    let names = pool.names();
    Ok(index::sample(rng, names.len(), count)
        .into_iter()
        .map(|i| names[i].clone())
        .collect())
}

/// Take the picked students off the pool
///
/// The picks were drawn from this very pool, so a miss means a logic error;
/// it is logged and returned instead of aborting the run.
pub fn remove_picked(pool: &mut Roster, picked: &[String]) -> Vec<String> {
    tracing::info!("Removing picked students from remaining student list");
    let mut failed = Vec::new();

    for name in picked {
        if !pool.remove_first(name) {
            tracing::error!(student = %name, "Trying to remove student from student list failed");
            failed.push(name.clone());
        }
    }

    failed
}
