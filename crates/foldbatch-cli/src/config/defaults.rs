use foldbatch::engine::config::DEFAULT_ENGINE_EXECUTABLE;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DefaultsConfig {
    pub predict_affinity: bool,
    pub affinity_samples: u32,
    pub engine_executable: PathBuf,
    pub engine_launcher: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            predict_affinity: false,
            affinity_samples: 5,
            engine_executable: PathBuf::from(DEFAULT_ENGINE_EXECUTABLE),
            engine_launcher: Vec::new(),
        }
    }
}
