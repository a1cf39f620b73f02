//! Binary codec for [`ModelDescriptor`].
//!
//! Field order and widths are a compatibility contract with the orchestration
//! layer. Multi-byte fields are little-endian.
//!
//! ```text
//! header        n_vars:u16 n_routes:u8 n_constraints:u8 obj_mode:u8 lambda:f64 profit_floor:f64
//! route         sell:u8 buy:u8 freight:u8 transit_cost_per_day:f64 base_transit_days:f64 unit_capacity:f64
//! constraint    ctype:u8 bound:u8 min:u8 outage:u8 outage_factor:f64 n_refs:u8 route:u8[*]
//!               (ctype 4 = custom: every route index is followed by coefficient:f64)
//! perturbation  stddev:f64 lo:f64 hi:f64 n_corr:u8 (var:u8 coefficient:f64)[n_corr]
//! ```
//!
//! Every count is checked against its limit as soon as it is read, so an
//! oversized model is rejected before the rest of the buffer is touched.

use super::cursor::{ByteReader, PutBytes};
use crate::domain::limits::{
    check_count, check_index, MAX_CONSTRAINTS, MAX_CORRELATIONS, MAX_ROUTES, MAX_VARS,
};
use crate::domain::{
    ConstraintKind, ConstraintSpec, Correlation, ModelDescriptor, ObjectiveMode, Outage,
    Perturbation, Route,
};
use crate::error::DecodeError;

/// Sentinel index meaning "not configured".
pub const ABSENT: u8 = 0xFF;

const CUSTOM_TAG: u8 = 4;

/// Decode a descriptor from the reader's current position.
///
/// The reader is left positioned after the last perturbation so the caller
/// can continue with the variable vector.
pub fn decode_descriptor(reader: &mut ByteReader<'_>) -> Result<ModelDescriptor, DecodeError> {
    let n_vars = reader.u16("header.n_vars")? as usize;
    check_count("n_vars", n_vars, MAX_VARS)?;
    let n_routes = reader.u8("header.n_routes")? as usize;
    check_count("n_routes", n_routes, MAX_ROUTES)?;
    let n_constraints = reader.u8("header.n_constraints")? as usize;
    check_count("n_constraints", n_constraints, MAX_CONSTRAINTS)?;

    let objective = ObjectiveMode::from_tag(reader.u8("header.obj_mode")?)?;
    let risk_lambda = reader.f64("header.lambda")?;
    let profit_floor = reader.f64("header.profit_floor")?;

    let mut routes = Vec::with_capacity(n_routes);
    for _ in 0..n_routes {
        routes.push(decode_route(reader, n_vars)?);
    }

    let mut constraints = Vec::with_capacity(n_constraints);
    for _ in 0..n_constraints {
        constraints.push(decode_constraint(reader, n_vars, n_routes)?);
    }

    let mut perturbations = Vec::with_capacity(n_vars);
    for _ in 0..n_vars {
        perturbations.push(decode_perturbation(reader, n_vars)?);
    }

    Ok(ModelDescriptor {
        n_vars,
        objective,
        risk_lambda,
        profit_floor,
        routes,
        constraints,
        perturbations,
    })
}

fn var_index(
    reader: &mut ByteReader<'_>,
    field: &'static str,
    n_vars: usize,
) -> Result<u8, DecodeError> {
    let idx = reader.u8(field)?;
    check_index(field, idx as usize, n_vars)?;
    Ok(idx)
}

fn optional_var_index(
    reader: &mut ByteReader<'_>,
    field: &'static str,
    n_vars: usize,
) -> Result<Option<u8>, DecodeError> {
    match reader.u8(field)? {
        ABSENT => Ok(None),
        idx => {
            check_index(field, idx as usize, n_vars)?;
            Ok(Some(idx))
        }
    }
}

fn decode_route(reader: &mut ByteReader<'_>, n_vars: usize) -> Result<Route, DecodeError> {
    Ok(Route {
        sell_var: var_index(reader, "route.sell_var", n_vars)?,
        buy_var: var_index(reader, "route.buy_var", n_vars)?,
        freight_var: var_index(reader, "route.freight_var", n_vars)?,
        transit_cost_per_day: reader.f64("route.transit_cost_per_day")?,
        base_transit_days: reader.f64("route.base_transit_days")?,
        unit_capacity: reader.f64("route.unit_capacity")?,
    })
}

fn decode_constraint(
    reader: &mut ByteReader<'_>,
    n_vars: usize,
    n_routes: usize,
) -> Result<ConstraintSpec, DecodeError> {
    let tag = reader.u8("constraint.type")?;
    if tag > CUSTOM_TAG {
        return Err(DecodeError::UnknownConstraintKind(tag));
    }
    let bound_var = var_index(reader, "constraint.bound_var", n_vars)?;
    let min_var = optional_var_index(reader, "constraint.min_var", n_vars)?;
    let outage_var = optional_var_index(reader, "constraint.outage_var", n_vars)?;
    let outage_factor = reader.f64("constraint.outage_factor")?;

    let n_refs = reader.u8("constraint.n_routes")? as usize;
    check_count("constraint.routes", n_refs, MAX_ROUTES)?;
    let mut routes = Vec::with_capacity(n_refs);
    let mut coefficients = Vec::new();
    for _ in 0..n_refs {
        let route = reader.u8("constraint.route")?;
        check_index("constraint.route", route as usize, n_routes)?;
        routes.push(route);
        if tag == CUSTOM_TAG {
            coefficients.push(reader.f64("constraint.coefficient")?);
        }
    }

    let kind = match tag {
        0 => ConstraintKind::Supply,
        1 => ConstraintKind::Demand,
        2 => ConstraintKind::Fleet,
        3 => ConstraintKind::Capital,
        _ => ConstraintKind::Custom { coefficients },
    };

    Ok(ConstraintSpec {
        kind,
        bound_var,
        min_var,
        outage: outage_var.map(|var| Outage {
            var,
            factor: outage_factor,
        }),
        routes,
    })
}

fn decode_perturbation(
    reader: &mut ByteReader<'_>,
    n_vars: usize,
) -> Result<Perturbation, DecodeError> {
    let stddev = reader.f64("perturbation.stddev")?;
    let lo = reader.f64("perturbation.lo")?;
    let hi = reader.f64("perturbation.hi")?;
    let n_corr = reader.u8("perturbation.n_corr")? as usize;
    check_count("n_correlations", n_corr, MAX_CORRELATIONS)?;

    let mut correlations = Vec::with_capacity(n_corr);
    for _ in 0..n_corr {
        correlations.push(Correlation {
            var: var_index(reader, "correlation.var", n_vars)?,
            coefficient: reader.f64("correlation.coefficient")?,
        });
    }

    Ok(Perturbation {
        stddev,
        lo,
        hi,
        correlations,
    })
}

/// Append the binary form of `model` to `out`.
///
/// The descriptor must already satisfy [`ModelDescriptor::validate`]; counts
/// are written with the widths of the wire format.
pub fn encode_descriptor(model: &ModelDescriptor, out: &mut Vec<u8>) {
    out.put_u16(model.n_vars as u16);
    out.put_u8(model.routes.len() as u8);
    out.put_u8(model.constraints.len() as u8);
    out.put_u8(model.objective.tag());
    out.put_f64(model.risk_lambda);
    out.put_f64(model.profit_floor);

    for route in &model.routes {
        out.put_u8(route.sell_var);
        out.put_u8(route.buy_var);
        out.put_u8(route.freight_var);
        out.put_f64(route.transit_cost_per_day);
        out.put_f64(route.base_transit_days);
        out.put_f64(route.unit_capacity);
    }

    for constraint in &model.constraints {
        out.put_u8(constraint.kind.tag());
        out.put_u8(constraint.bound_var);
        out.put_u8(constraint.min_var.unwrap_or(ABSENT));
        match constraint.outage {
            Some(outage) => {
                out.put_u8(outage.var);
                out.put_f64(outage.factor);
            }
            None => {
                out.put_u8(ABSENT);
                out.put_f64(1.0);
            }
        }
        out.put_u8(constraint.routes.len() as u8);
        match &constraint.kind {
            ConstraintKind::Custom { coefficients } => {
                for (route, coefficient) in constraint.routes.iter().zip(coefficients) {
                    out.put_u8(*route);
                    out.put_f64(*coefficient);
                }
            }
            _ => out.extend_from_slice(&constraint.routes),
        }
    }

    for perturbation in &model.perturbations {
        out.put_f64(perturbation.stddev);
        out.put_f64(perturbation.lo);
        out.put_f64(perturbation.hi);
        out.put_u8(perturbation.correlations.len() as u8);
        for corr in &perturbation.correlations {
            out.put_u8(corr.var);
            out.put_f64(corr.coefficient);
        }
    }
}
