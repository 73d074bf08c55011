// Library entry point for route-assembler

pub mod config;
pub mod data_management;
pub mod engine;
pub mod pair;
pub mod token;
pub mod types;
pub mod utils;

pub use engine::assembler::{Assembler, AssemblerConfig};
pub use engine::hops::{hops_to_json, into_hops, printout, Hop};
pub use engine::path::{PathNode, PathStatus};
pub use engine::RoutePlanner;
pub use pair::{build_universe, Pair};
pub use token::TokenIdentity;
pub use types::{Result, RouteError};
