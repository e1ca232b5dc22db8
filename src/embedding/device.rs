use candle_core::Device;
use tracing::{debug, warn};

/// Picks the sentence-encoder device from the compiled features, falling back to CPU.
pub fn select_device() -> Device {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                tracing::info!("Sentence encoder using Metal");
                return device;
            }
            Err(e) => failures.push(format!("metal: {e}")),
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                tracing::info!("Sentence encoder using CUDA");
                return device;
            }
            Err(e) => failures.push(format!("cuda: {e}")),
        }
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled, using CPU");
    } else {
        let reason = failures.join("; ");
        warn!(reason = %reason, "GPU unavailable, using CPU");
    }

    Device::Cpu
}
