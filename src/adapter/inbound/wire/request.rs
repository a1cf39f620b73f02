//! Request payload codec.
//!
//! ```text
//! command 1 (solve)        descriptor, vars:f64[n_vars]
//! command 2 (monte carlo)  scenarios:u32, descriptor, vars:f64[n_vars]
//! ```

use super::cursor::{ByteReader, PutBytes};
use super::descriptor::{decode_descriptor, encode_descriptor};
use crate::domain::limits::{check_count, MAX_SCENARIOS};
use crate::domain::ModelDescriptor;
use crate::error::DecodeError;

pub const COMMAND_SOLVE: u8 = 1;
pub const COMMAND_MONTE_CARLO: u8 = 2;

/// A decoded request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Solve {
        model: ModelDescriptor,
        vars: Vec<f64>,
    },
    MonteCarlo {
        scenarios: u32,
        model: ModelDescriptor,
        vars: Vec<f64>,
    },
}

impl Request {
    /// Wire command byte.
    #[must_use]
    pub const fn command(&self) -> u8 {
        match self {
            Self::Solve { .. } => COMMAND_SOLVE,
            Self::MonteCarlo { .. } => COMMAND_MONTE_CARLO,
        }
    }

    /// Decode a frame body (command byte followed by payload).
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(body);
        let command = reader.u8("command")?;
        let request = match command {
            COMMAND_SOLVE => {
                let (model, vars) = decode_model_and_vars(&mut reader)?;
                Self::Solve { model, vars }
            }
            COMMAND_MONTE_CARLO => {
                let scenarios = reader.u32("scenario_count")?;
                check_count("scenario_count", scenarios as usize, MAX_SCENARIOS)?;
                let (model, vars) = decode_model_and_vars(&mut reader)?;
                Self::MonteCarlo {
                    scenarios,
                    model,
                    vars,
                }
            }
            other => return Err(DecodeError::UnknownCommand(other)),
        };
        reader.finish()?;
        Ok(request)
    }

    /// Encode as a frame body.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.command()];
        let (model, vars) = match self {
            Self::Solve { model, vars } => (model, vars),
            Self::MonteCarlo {
                scenarios,
                model,
                vars,
            } => {
                out.put_u32(*scenarios);
                (model, vars)
            }
        };
        encode_descriptor(model, &mut out);
        for value in vars {
            out.put_f64(*value);
        }
        out
    }
}

fn decode_model_and_vars(
    reader: &mut ByteReader<'_>,
) -> Result<(ModelDescriptor, Vec<f64>), DecodeError> {
    let model = decode_descriptor(reader)?;
    let mut vars = Vec::with_capacity(model.n_vars);
    for _ in 0..model.n_vars {
        vars.push(reader.f64("variables")?);
    }
    Ok((model, vars))
}
