pub mod nonce;
pub mod script_hashes;

pub use nonce::NonceGenerator;
pub use script_hashes::ScriptHashes;
