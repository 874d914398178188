#![forbid(unsafe_code)]

pub mod final_positions;
pub mod groups;
pub mod matches;
pub mod play_offs;
pub mod qualification;
pub mod report;
pub mod standings;
pub mod team;
pub mod tournament;
pub mod traits;

pub use rand_seeder::Seeder;
pub use team::{Team, TournamentConfig};
pub use tournament::{simulate_tournament, Simulation, TournamentError, TournamentReport};
pub use traits::RandomSource;

/// Random number generator used to run simulations.
pub type RandGen = rand_pcg::Pcg64;

/// Generates a new random seed.
#[inline]
pub fn gen_seed() -> [u8; 32] {
    rand::random()
}

/// Creates a [`Seeder`] from a new random seed.
#[inline]
pub fn gen_seeder() -> Seeder {
    Seeder::from(gen_seed())
}
