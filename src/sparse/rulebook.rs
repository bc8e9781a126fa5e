/// Rulebook construction.

use tracing::debug;

use super::extract::NonzeroList;
use super::output_map::OutputCoordList;
use crate::config::ConvGeometry;
use crate::error::{Error, Result};

/// One multiply-accumulate: `output[output_index] += input[input_index] * kernel[kernel_index]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub input_index: usize,
    pub output_index: usize,
    pub kernel_index: usize,
}

/// How the builder recovers input and kernel indices for each output entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RulebookPolicy {
    /// Use the origin recorded by the mapper for every entry.
    #[default]
    Explicit,
    /// Recover indices from the entry position: `i / (K^2 * OC)` and
    /// `i % (K^2 * OC)`. Only valid when every nonzero emitted a full block of
    /// `K^2 * OC` entries; a short block is reported as [`Error::TruncatedTaps`].
    ///
    /// Within a block the entries run `kh, kw, oc`, so the recovered kernel
    /// index names the right weight only when all weights are equal.
    Positional,
}

/// The execution plan of a sparse convolution, one [`Rule`] per output entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rulebook {
    rules: Vec<Rule>,
}

impl Rulebook {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Rule> {
        self.rules.get(i).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }
}

/// Build the rulebook for `outputs` under `policy`.
pub fn build_rulebook(
    nonzeros: &NonzeroList,
    outputs: &OutputCoordList,
    geometry: &ConvGeometry,
    policy: RulebookPolicy,
) -> Result<Rulebook> {
    let rules = match policy {
        RulebookPolicy::Explicit => outputs
            .origins()
            .iter()
            .enumerate()
            .map(|(output_index, origin)| Rule {
                input_index: origin.input_index,
                output_index,
                kernel_index: origin.kernel_index,
            })
            .collect(),
        RulebookPolicy::Positional => {
            let block = geometry.taps() * geometry.out_channels;
            check_full_blocks(nonzeros, outputs, block)?;
            (0..outputs.len())
                .map(|i| Rule {
                    input_index: i / block,
                    output_index: i,
                    kernel_index: i % block,
                })
                .collect()
        }
    };
    debug!(?policy, rules = outputs.len(), "built rulebook");
    Ok(Rulebook { rules })
}

fn check_full_blocks(nonzeros: &NonzeroList, outputs: &OutputCoordList, block: usize) -> Result<()> {
    let counts = outputs.entries_per_input(nonzeros.len());
    if let Some((input_index, &emitted)) = counts.iter().enumerate().find(|&(_, &n)| n != block) {
        return Err(Error::TruncatedTaps {
            input_index,
            emitted,
            expected: block,
        });
    }
    Ok(())
}
