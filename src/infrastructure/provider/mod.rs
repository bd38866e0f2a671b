mod mock_provider;
mod sarvam_batch;

pub use mock_provider::MockBatchProvider;
pub use sarvam_batch::SarvamBatchProvider;
