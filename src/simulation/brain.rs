//! Neural network controller for cars.
//!
//! A bias-free multi-layer perceptron with tanh activation on every layer.
//! Layer matrices are cut directly out of a [`Genome`]'s flat weight vector.

use ndarray::{Array1, Array2, s};

use super::error::{Error, Result};
use super::genome::Genome;

/// Feed-forward network built from a genome.
///
/// Holds no state between calls: [`Brain::think`] depends only on the weights
/// and its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Brain {
    /// Weight matrices (`output_size` × `input_size`), input to output.
    layers: Vec<Array2<f32>>,
}

impl Brain {
    /// Slices the genome's weights into per-layer matrices.
    pub fn from_genome(genome: &Genome) -> Result<Self> {
        let weights = genome.weights();
        let sizes = genome.topology().layer_sizes();
        let mismatch = || Error::TopologyMismatch {
            what: "network weight count",
            expected: genome.topology().weight_count(),
            found: weights.len(),
        };

        let mut offset = 0;
        let mut layers = Vec::with_capacity(sizes.len() - 1);
        for pair in sizes.windows(2) {
            let (input_size, output_size) = (pair[0], pair[1]);
            let end = offset + input_size * output_size;
            if end > weights.len() {
                return Err(mismatch());
            }

            let layer = Array2::from_shape_vec(
                (output_size, input_size),
                weights.slice(s![offset..end]).to_vec(),
            )
            .map_err(|_| mismatch())?;
            layers.push(layer);
            offset = end;
        }

        if offset != weights.len() {
            return Err(mismatch());
        }

        Ok(Self { layers })
    }

    /// Number of inputs the network expects.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.ncols())
    }

    /// Number of outputs the network produces.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.nrows())
    }

    /// Runs a forward pass through all layers.
    ///
    /// Every output lies in `(-1, 1)`.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Result<Array1<f32>> {
        if inputs.len() != self.input_size() {
            return Err(Error::TopologyMismatch {
                what: "network inputs",
                expected: self.input_size(),
                found: inputs.len(),
            });
        }

        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.dot(&output);
            output.mapv_inplace(f32::tanh);
        }

        Ok(output)
    }
}
