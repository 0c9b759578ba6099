/*
  Tenor, a UCI-compatible chess engine.
  Copyright (C) 2026 The Tenor Authors.

  Tenor is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Tenor is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! An optional neural evaluator that can replace the handcrafted one.
//!
//! The weights file is a flat little-endian `f32` blob:
//! `input_weights[768 x H1] | hidden1_bias[H1] | hidden1_weights[H1 x H2] |
//! hidden2_bias[H2] | hidden2_weights[H2] | output_bias`. The input layer is
//! a 768-way one-hot-multi encoding (12 piece kinds x 64 squares); both
//! hidden layers use clipped-ReLU activations, and the scalar output times
//! 400 is the evaluation in centipawns, from White's point of view.
//!
//! To the rest of the engine this is a black box with a single entry point,
//! [`Network::evaluate`], which returns a side-to-move-perspective score
//! just like the handcrafted evaluation.

use crate::base::{Board, Color, Piece};
use crate::engine::eval::Eval;

/// Scale from the network's pawn-unit output to centipawns.
const OUTPUT_SCALE: f32 = 400.0;

/// The number of input features.
const INPUTS: usize = 768;

/// The hidden-layer shapes the loader accepts.
const ARCHITECTURES: [(usize, usize); 2] = [(256, 32), (512, 64)];

/// A loaded two-hidden-layer network.
pub struct Network {
    /// First hidden layer width.
    pub h1: usize,
    /// Second hidden layer width.
    pub h2: usize,
    input_weights: Vec<f32>,
    hidden1_bias: Vec<f32>,
    hidden1_weights: Vec<f32>,
    hidden2_bias: Vec<f32>,
    hidden2_weights: Vec<f32>,
    output_bias: f32,
}

/// The number of floats a network of the given shape occupies.
const fn blob_len(h1: usize, h2: usize) -> usize {
    INPUTS * h1 + h1 + h1 * h2 + h2 + h2 + 1
}

impl Network {
    /// Load a network from a weights file, inferring the architecture from
    /// the file size.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the file cannot be read or its size matches no
    /// supported architecture.
    pub fn load(path: &str) -> Result<Network, String> {
        let bytes = std::fs::read(path).map_err(|e| format!("cannot read `{path}`: {e}"))?;
        if bytes.len() % 4 != 0 {
            return Err("weights file is not a whole number of f32 values".into());
        }
        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes(c.try_into().unwrap_or([0; 4])))
            .collect();

        for (h1, h2) in ARCHITECTURES {
            if floats.len() == blob_len(h1, h2) {
                return Network::from_floats(h1, h2, &floats);
            }
        }
        Err(format!(
            "weights file holds {} values, matching no supported architecture",
            floats.len()
        ))
    }

    /// Assemble a network from its flat float representation.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the slice length does not match the shape.
    pub fn from_floats(h1: usize, h2: usize, floats: &[f32]) -> Result<Network, String> {
        if floats.len() != blob_len(h1, h2) {
            return Err("weight count does not match the network shape".into());
        }
        let mut at = 0;
        let mut take = |n: usize| {
            let slice = floats[at..at + n].to_vec();
            at += n;
            slice
        };
        let input_weights = take(INPUTS * h1);
        let hidden1_bias = take(h1);
        let hidden1_weights = take(h1 * h2);
        let hidden2_bias = take(h2);
        let hidden2_weights = take(h2);
        let output_bias = floats[at];
        Ok(Network {
            h1,
            h2,
            input_weights,
            hidden1_bias,
            hidden1_weights,
            hidden2_bias,
            hidden2_weights,
            output_bias,
        })
    }

    #[must_use]
    /// Evaluate a position, in centipawns from the side to move's
    /// perspective.
    pub fn evaluate(&self, b: &Board) -> Eval {
        // accumulate the active features into the first hidden layer
        let mut acc = self.hidden1_bias.clone();
        for piece in Piece::ALL {
            for sq in b[piece] {
                let feature = piece as usize * 64 + sq.index();
                let row = &self.input_weights[feature * self.h1..(feature + 1) * self.h1];
                for (a, w) in acc.iter_mut().zip(row) {
                    *a += w;
                }
            }
        }

        let mut hidden = vec![0f32; self.h2];
        for (i, &a) in acc.iter().enumerate() {
            let activated = clipped_relu(a);
            if activated == 0.0 {
                continue;
            }
            let row = &self.hidden1_weights[i * self.h2..(i + 1) * self.h2];
            for (h, w) in hidden.iter_mut().zip(row) {
                *h += activated * w;
            }
        }

        let mut output = self.output_bias;
        for ((&h, &bias), &w) in hidden
            .iter()
            .zip(&self.hidden2_bias)
            .zip(&self.hidden2_weights)
        {
            output += clipped_relu(h + bias) * w;
        }

        #[allow(clippy::cast_possible_truncation)]
        let white_cp = (output * OUTPUT_SCALE) as i32;
        let cp = match b.side {
            Color::White => white_cp,
            Color::Black => -white_cp,
        };
        // never let a network value collide with the mate range
        Eval::cp(cp.clamp(-Eval::MATE_ZONE + 1, Eval::MATE_ZONE - 1))
    }
}

/// The clipped-ReLU activation used by both hidden layers.
fn clipped_relu(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Square;

    /// A tiny synthetic network for the smallest supported shape, zeroed
    /// except where a test pokes values in.
    fn zero_floats() -> Vec<f32> {
        vec![0.0; blob_len(256, 32)]
    }

    #[test]
    fn shape_validation() {
        assert!(Network::from_floats(256, 32, &zero_floats()).is_ok());
        assert!(Network::from_floats(256, 32, &zero_floats()[1..]).is_err());
        assert!(Network::from_floats(512, 64, &zero_floats()).is_err());
    }

    #[test]
    fn zero_network_evaluates_to_zero() {
        let net = Network::from_floats(256, 32, &zero_floats()).unwrap();
        assert_eq!(net.evaluate(&Board::new()), Eval::cp(0));
    }

    #[test]
    /// Wire one path through the network by hand and check the arithmetic:
    /// feature -> neuron 0 -> hidden 0 -> output.
    fn single_path_forward() {
        let mut floats = zero_floats();
        let feature = Piece::WhitePawn as usize * 64 + Square::E2.index();
        // input weight (feature, neuron 0) = 0.5
        floats[feature * 256] = 0.5;
        // hidden1 weight (neuron 0, hidden 0) = 1.0
        let h1_weights_at = 768 * 256 + 256;
        floats[h1_weights_at] = 1.0;
        // hidden2 weight (hidden 0) = 2.0
        let h2_weights_at = h1_weights_at + 256 * 32 + 32;
        floats[h2_weights_at] = 2.0;

        let net = Network::from_floats(256, 32, &floats).unwrap();
        let b = Board::new();
        // clip(0.5) feeds hidden 0 with 0.5; clip(0.5) * 2.0 = 1.0 at the
        // output, times 400 = 400 cp for White
        assert_eq!(net.evaluate(&b), Eval::cp(400));

        // from Black's perspective the same position is -400
        let mut black_to_move = b;
        black_to_move.side = crate::base::Color::Black;
        black_to_move.hash = black_to_move.fresh_hash();
        assert_eq!(net.evaluate(&black_to_move), Eval::cp(-400));
    }

    #[test]
    fn output_bias_feeds_through() {
        let mut floats = zero_floats();
        let len = floats.len();
        floats[len - 1] = 0.25;
        let net = Network::from_floats(256, 32, &floats).unwrap();
        assert_eq!(net.evaluate(&Board::new()), Eval::cp(100));
    }
}
