//! LSTM model configuration

use serde::{Deserialize, Serialize};

/// Shape and regularization parameters of one LSTM instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmConfig {
    /// Number of input features per time step
    pub input_size: usize,
    /// Hidden state width
    pub hidden_size: usize,
    /// Number of outputs
    pub output_size: usize,
    /// Number of stacked LSTM layers
    pub num_layers: usize,
    /// Dropout probability applied to the final hidden state while training
    pub dropout: f64,
}

impl LstmConfig {
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        Self {
            input_size,
            hidden_size,
            output_size,
            num_layers: 1,
            dropout: 0.0,
        }
    }

    pub fn with_layers(mut self, num_layers: usize) -> Self {
        self.num_layers = num_layers;
        self
    }

    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }
}

impl Default for LstmConfig {
    fn default() -> Self {
        Self::new(1, 64, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = LstmConfig::new(5, 32, 1).with_layers(2).with_dropout(0.2);
        assert_eq!(config.input_size, 5);
        assert_eq!(config.hidden_size, 32);
        assert_eq!(config.num_layers, 2);
        assert_eq!(config.dropout, 0.2);
    }
}
