//! Response payload codec.
//!
//! A response body is a status byte followed by a payload. Status 0 carries a
//! serialized [`SolveResult`] or [`MonteCarloResult`]; status 1 carries the
//! UTF-8 text of the [`DecodeError`] that rejected the request.
//!
//! ```text
//! solve        status:u8 n_routes:u8 (tons:f64 margin:f64)[n] profit:f64 cost:f64
//!              roi:f64 objective:f64 n_constraints:u8 shadow:f64[n]
//! monte carlo  n_scenarios:u32 n_feasible:u32 n_infeasible:u32 metric:u8
//!              mean stddev p5 p25 p50 p75 p95 min max:f64
//!              profit_cvar5 risk_adjusted_profit probability_positive:f64 signal:u8
//!              n_sens:u8 (var:u8 correlation:f64)[n]
//! ```

use super::cursor::{ByteReader, PutBytes};
use crate::domain::{
    Distribution, MetricKind, MonteCarloResult, RouteAllocation, Sensitivity, Signal,
    SolveResult, SolveStatus,
};
use crate::error::DecodeError;

/// Response status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok = 0,
    DecodeError = 1,
}

/// A response ready to be framed.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Solve(SolveResult),
    MonteCarlo(MonteCarloResult),
    /// The request could not be decoded or failed validation.
    Rejected(DecodeError),
}

impl Response {
    #[must_use]
    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::Solve(_) | Self::MonteCarlo(_) => ResponseStatus::Ok,
            Self::Rejected(_) => ResponseStatus::DecodeError,
        }
    }

    /// Encode as a frame body.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.status() as u8];
        match self {
            Self::Solve(result) => encode_solve_result(result, &mut out),
            Self::MonteCarlo(result) => encode_monte_carlo_result(result, &mut out),
            Self::Rejected(error) => out.extend_from_slice(error.to_string().as_bytes()),
        }
        out
    }
}

fn encode_solve_result(result: &SolveResult, out: &mut Vec<u8>) {
    out.put_u8(result.status.tag());
    out.put_u8(result.routes.len() as u8);
    for route in &result.routes {
        out.put_f64(route.tons);
        out.put_f64(route.margin);
    }
    out.put_f64(result.profit);
    out.put_f64(result.cost);
    out.put_f64(result.roi);
    out.put_f64(result.objective);
    out.put_u8(result.shadow_prices.len() as u8);
    for shadow in &result.shadow_prices {
        out.put_f64(*shadow);
    }
}

fn encode_monte_carlo_result(result: &MonteCarloResult, out: &mut Vec<u8>) {
    out.put_u32(result.n_scenarios);
    out.put_u32(result.n_feasible);
    out.put_u32(result.n_infeasible);
    out.put_u8(result.metric.tag());
    let d = &result.distribution;
    for value in [
        d.mean, d.stddev, d.p5, d.p25, d.p50, d.p75, d.p95, d.min, d.max,
    ] {
        out.put_f64(value);
    }
    out.put_f64(result.profit_cvar5);
    out.put_f64(result.risk_adjusted_profit);
    out.put_f64(result.probability_positive);
    out.put_u8(result.signal.tag());
    out.put_u8(result.sensitivities.len() as u8);
    for sensitivity in &result.sensitivities {
        out.put_u8(sensitivity.var);
        out.put_f64(sensitivity.correlation);
    }
}

/// Decode a [`SolveResult`] payload (the bytes after the response status).
pub fn decode_solve_result(payload: &[u8]) -> Result<SolveResult, DecodeError> {
    let mut r = ByteReader::new(payload);
    let status = match r.u8("solve.status")? {
        0 => SolveStatus::Optimal,
        1 => SolveStatus::Infeasible,
        _ => SolveStatus::Error,
    };
    let n_routes = r.u8("solve.n_routes")? as usize;
    let mut routes = Vec::with_capacity(n_routes);
    for _ in 0..n_routes {
        routes.push(RouteAllocation {
            tons: r.f64("solve.tons")?,
            margin: r.f64("solve.margin")?,
        });
    }
    let profit = r.f64("solve.profit")?;
    let cost = r.f64("solve.cost")?;
    let roi = r.f64("solve.roi")?;
    let objective = r.f64("solve.objective")?;
    let n_constraints = r.u8("solve.n_constraints")? as usize;
    let mut shadow_prices = Vec::with_capacity(n_constraints);
    for _ in 0..n_constraints {
        shadow_prices.push(r.f64("solve.shadow_price")?);
    }
    r.finish()?;
    Ok(SolveResult {
        status,
        routes,
        profit,
        cost,
        roi,
        objective,
        shadow_prices,
    })
}

/// Decode a [`MonteCarloResult`] payload (the bytes after the response status).
pub fn decode_monte_carlo_result(payload: &[u8]) -> Result<MonteCarloResult, DecodeError> {
    let mut r = ByteReader::new(payload);
    let n_scenarios = r.u32("mc.n_scenarios")?;
    let n_feasible = r.u32("mc.n_feasible")?;
    let n_infeasible = r.u32("mc.n_infeasible")?;
    let metric = match r.u8("mc.metric")? {
        0 => MetricKind::Profit,
        1 => MetricKind::Cost,
        _ => MetricKind::Roi,
    };
    let distribution = Distribution {
        mean: r.f64("mc.mean")?,
        stddev: r.f64("mc.stddev")?,
        p5: r.f64("mc.p5")?,
        p25: r.f64("mc.p25")?,
        p50: r.f64("mc.p50")?,
        p75: r.f64("mc.p75")?,
        p95: r.f64("mc.p95")?,
        min: r.f64("mc.min")?,
        max: r.f64("mc.max")?,
    };
    let profit_cvar5 = r.f64("mc.profit_cvar5")?;
    let risk_adjusted_profit = r.f64("mc.risk_adjusted_profit")?;
    let probability_positive = r.f64("mc.probability_positive")?;
    let signal = match r.u8("mc.signal")? {
        0 => Signal::StrongGo,
        1 => Signal::Go,
        2 => Signal::Cautious,
        3 => Signal::Weak,
        _ => Signal::NoGo,
    };
    let n_sens = r.u8("mc.n_sensitivities")? as usize;
    let mut sensitivities = Vec::with_capacity(n_sens);
    for _ in 0..n_sens {
        sensitivities.push(Sensitivity {
            var: r.u8("mc.sensitivity.var")?,
            correlation: r.f64("mc.sensitivity.correlation")?,
        });
    }
    r.finish()?;
    Ok(MonteCarloResult {
        n_scenarios,
        n_feasible,
        n_infeasible,
        metric,
        distribution,
        sensitivities,
        profit_cvar5,
        risk_adjusted_profit,
        probability_positive,
        signal,
    })
}
