//! LSTM for time series prediction
//!
//! Multi-layer LSTM cells encode each input sequence into a final hidden
//! state; a linear head maps that state to the prediction. Training
//! updates the head with analytic MAE gradients through an optimizer,
//! leaving the recurrent weights as a fixed random encoder.

use crate::model::config::LstmConfig;
use crate::model::optimizer::Optimizer;
use ndarray::{s, Array1, Array2, Array3, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One LSTM cell: the four gates of a single layer.
#[derive(Debug, Clone)]
pub struct LstmCell {
    pub input_size: usize,
    pub hidden_size: usize,

    // Input gate
    w_ii: Array2<f64>,
    w_hi: Array2<f64>,
    b_i: Array1<f64>,

    // Forget gate
    w_if: Array2<f64>,
    w_hf: Array2<f64>,
    b_f: Array1<f64>,

    // Cell candidate
    w_ig: Array2<f64>,
    w_hg: Array2<f64>,
    b_g: Array1<f64>,

    // Output gate
    w_io: Array2<f64>,
    w_ho: Array2<f64>,
    b_o: Array1<f64>,
}

impl LstmCell {
    pub fn new(input_size: usize, hidden_size: usize) -> Self {
        let limit = (1.0 / hidden_size as f64).sqrt();

        Self {
            input_size,
            hidden_size,
            w_ii: Array2::random((hidden_size, input_size), Uniform::new(-limit, limit)),
            w_hi: Array2::random((hidden_size, hidden_size), Uniform::new(-limit, limit)),
            b_i: Array1::zeros(hidden_size),
            w_if: Array2::random((hidden_size, input_size), Uniform::new(-limit, limit)),
            w_hf: Array2::random((hidden_size, hidden_size), Uniform::new(-limit, limit)),
            // Forget bias starts at 1 so early training retains state
            b_f: Array1::from_elem(hidden_size, 1.0),
            w_ig: Array2::random((hidden_size, input_size), Uniform::new(-limit, limit)),
            w_hg: Array2::random((hidden_size, hidden_size), Uniform::new(-limit, limit)),
            b_g: Array1::zeros(hidden_size),
            w_io: Array2::random((hidden_size, input_size), Uniform::new(-limit, limit)),
            w_ho: Array2::random((hidden_size, hidden_size), Uniform::new(-limit, limit)),
            b_o: Array1::zeros(hidden_size),
        }
    }

    /// One time step: returns the next (hidden, cell) state pair.
    pub fn forward(
        &self,
        x: &Array1<f64>,
        h_prev: &Array1<f64>,
        c_prev: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let i_gate = sigmoid(&(self.w_ii.dot(x) + self.w_hi.dot(h_prev) + &self.b_i));
        let f_gate = sigmoid(&(self.w_if.dot(x) + self.w_hf.dot(h_prev) + &self.b_f));
        let g = tanh(&(self.w_ig.dot(x) + self.w_hg.dot(h_prev) + &self.b_g));
        let o_gate = sigmoid(&(self.w_io.dot(x) + self.w_ho.dot(h_prev) + &self.b_o));

        let c_next = &f_gate * c_prev + &i_gate * &g;
        let h_next = &o_gate * &tanh(&c_next);

        (h_next, c_next)
    }

    /// Zero-initialized (hidden, cell) state.
    pub fn init_hidden(&self) -> (Array1<f64>, Array1<f64>) {
        (
            Array1::zeros(self.hidden_size),
            Array1::zeros(self.hidden_size),
        )
    }
}

/// Stacked LSTM with a linear output head.
#[derive(Debug, Clone)]
pub struct Lstm {
    pub config: LstmConfig,
    cells: Vec<LstmCell>,
    w_out: Array2<f64>,
    b_out: Array1<f64>,
    rng: StdRng,
}

impl Lstm {
    pub fn from_config(config: LstmConfig) -> Self {
        let mut cells = Vec::with_capacity(config.num_layers);

        // First layer consumes the input features
        cells.push(LstmCell::new(config.input_size, config.hidden_size));
        for _ in 1..config.num_layers {
            cells.push(LstmCell::new(config.hidden_size, config.hidden_size));
        }

        let limit = (1.0 / config.hidden_size as f64).sqrt();
        let w_out = Array2::random(
            (config.output_size, config.hidden_size),
            Uniform::new(-limit, limit),
        );
        let b_out = Array1::zeros(config.output_size);

        Self {
            config,
            cells,
            w_out,
            b_out,
            rng: StdRng::from_entropy(),
        }
    }

    /// Encode each sample of a `(batch, seq_len, features)` input into its
    /// final hidden state, `(batch, hidden)`.
    fn encode_batch(&self, x: &Array3<f64>) -> Array2<f64> {
        let batch_size = x.shape()[0];
        let seq_len = x.shape()[1];

        let mut hidden = Array2::zeros((batch_size, self.config.hidden_size));

        for b in 0..batch_size {
            let mut states: Vec<(Array1<f64>, Array1<f64>)> =
                self.cells.iter().map(|cell| cell.init_hidden()).collect();

            for t in 0..seq_len {
                let mut layer_input: Array1<f64> = x.slice(s![b, t, ..]).to_owned();

                for (layer_idx, cell) in self.cells.iter().enumerate() {
                    let (h_prev, c_prev) = &states[layer_idx];
                    let (h_next, c_next) = cell.forward(&layer_input, h_prev, c_prev);
                    layer_input = h_next.clone();
                    states[layer_idx] = (h_next, c_next);
                }
            }

            let final_hidden = &states[self.cells.len() - 1].0;
            hidden.row_mut(b).assign(final_hidden);
        }

        hidden
    }

    fn project(&self, hidden: &Array2<f64>) -> Array2<f64> {
        hidden.dot(&self.w_out.t()) + &self.b_out
    }

    /// Inverted dropout on the encoded states, training only.
    fn apply_dropout(&mut self, hidden: &mut Array2<f64>) {
        let p = self.config.dropout;
        if p <= 0.0 {
            return;
        }
        let scale = 1.0 / (1.0 - p);
        for value in hidden.iter_mut() {
            if self.rng.gen::<f64>() < p {
                *value = 0.0;
            } else {
                *value *= scale;
            }
        }
    }

    /// Forward pass without dropout or parameter mutation.
    pub fn predict(&self, x: &Array3<f64>) -> Array2<f64> {
        let hidden = self.encode_batch(x);
        self.project(&hidden)
    }

    /// One training step on a batch: forward with dropout, MAE gradient
    /// through the output head, optimizer update. Returns the predictions
    /// the gradients were computed from.
    pub fn train_batch(
        &mut self,
        x: &Array3<f64>,
        y: &Array2<f64>,
        optimizer: &mut dyn Optimizer,
    ) -> Array2<f64> {
        let mut hidden = self.encode_batch(x);
        self.apply_dropout(&mut hidden);
        let predictions = self.project(&hidden);

        // d mean(|pred - y|) / d pred
        let n = predictions.len() as f64;
        let dpred = (&predictions - y).mapv(|d| {
            if d == 0.0 {
                0.0
            } else {
                d.signum() / n
            }
        });

        let grad_w = dpred.t().dot(&hidden);
        let grad_b = dpred.sum_axis(Axis(0));

        optimizer.update_weights(&mut self.w_out, &grad_w);
        optimizer.update_biases(&mut self.b_out, &grad_b);

        predictions
    }
}

fn sigmoid(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

fn tanh(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| v.tanh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mae;
    use crate::model::optimizer::Adam;
    use ndarray::Array3;

    #[test]
    fn test_cell_shapes() {
        let cell = LstmCell::new(5, 10);
        let x = Array1::zeros(5);
        let (h, c) = cell.init_hidden();

        let (h_next, c_next) = cell.forward(&x, &h, &c);
        assert_eq!(h_next.len(), 10);
        assert_eq!(c_next.len(), 10);
    }

    #[test]
    fn test_predict_shape() {
        let model = Lstm::from_config(LstmConfig::new(3, 16, 2).with_layers(2));
        let x = Array3::zeros((4, 10, 3));
        let out = model.predict(&x);
        assert_eq!(out.dim(), (4, 2));
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_predict_has_no_side_effects() {
        let model = Lstm::from_config(LstmConfig::new(2, 8, 1));
        let x = Array3::from_shape_fn((3, 5, 2), |(b, t, f)| (b + t + f) as f64 * 0.1);
        let a = model.predict(&x);
        let b = model.predict(&x);
        assert_eq!(a, b);
    }

    #[test]
    fn test_training_reduces_loss_on_constant_target() {
        let mut model = Lstm::from_config(LstmConfig::new(1, 8, 1));
        let mut optimizer = Adam::new(0.01);

        let x = Array3::from_shape_fn((8, 5, 1), |(b, t, _)| ((b + t) as f64).sin());
        let y = Array2::zeros((8, 1));

        let initial = mae(&y, &model.predict(&x));
        for _ in 0..300 {
            model.train_batch(&x, &y, &mut optimizer);
        }
        let trained = mae(&y, &model.predict(&x));

        assert!(trained < initial, "loss {trained} not below {initial}");
    }
}
