//! Binary worker over in-memory streams.

mod support;

use std::io::Cursor;

use dispatch_optimizer::adapter::inbound::wire::cursor::ByteReader;
use dispatch_optimizer::adapter::inbound::wire::{
    decode_descriptor, decode_monte_carlo_result, decode_solve_result, encode_descriptor,
    Request, ResponseStatus, StreamChannel, Worker,
};
use dispatch_optimizer::domain::limits::{
    MAX_CONSTRAINTS, MAX_CORRELATIONS, MAX_ROUTES, MAX_VARS,
};
use dispatch_optimizer::domain::{
    ConstraintKind, Correlation, ModelDescriptor, ObjectiveMode, Outage, Perturbation, Route,
    SolveStatus,
};
use dispatch_optimizer::error::ProtocolError;
use support::frame::{frame, split_frames};
use support::model::{cap, continuous, route, service, two_route_model, TWO_ROUTE_VARS};

const MAX_FRAME: usize = 1 << 20;

fn run_worker(input: Vec<u8>) -> (Result<u64, ProtocolError>, Vec<Vec<u8>>) {
    let worker = Worker::new(service());
    let mut channel = StreamChannel::new(Cursor::new(input), Vec::new(), MAX_FRAME);
    let served = worker.serve(&mut channel);
    (served, split_frames(&channel.into_writer()))
}

fn solve_request() -> Vec<u8> {
    Request::Solve {
        model: two_route_model(),
        vars: TWO_ROUTE_VARS.to_vec(),
    }
    .encode()
}

#[test]
fn solve_request_round_trip() {
    let (served, responses) = run_worker(frame(&solve_request()));
    assert_eq!(served.unwrap(), 1);
    assert_eq!(responses.len(), 1);

    let body = &responses[0];
    assert_eq!(body[0], ResponseStatus::Ok as u8);
    let result = decode_solve_result(&body[1..]).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    assert!((result.profit - 56_000.0).abs() < 1e-3);
    assert!((result.routes[0].tons - 1000.0).abs() < 1e-6);
    assert!((result.routes[1].tons - 200.0).abs() < 1e-6);
    assert!(result.shadow_prices[2] > 0.0);
}

#[test]
fn monte_carlo_request_round_trip() {
    let mut model = two_route_model();
    model.perturbations[0] = continuous(5.0, 0.0, 100.0);
    let body = Request::MonteCarlo {
        scenarios: 200,
        model,
        vars: TWO_ROUTE_VARS.to_vec(),
    }
    .encode();

    let (served, responses) = run_worker(frame(&body));
    assert_eq!(served.unwrap(), 1);
    assert_eq!(responses[0][0], ResponseStatus::Ok as u8);
    let result = decode_monte_carlo_result(&responses[0][1..]).unwrap();
    assert_eq!(result.n_scenarios, 200);
    assert_eq!(result.n_feasible + result.n_infeasible, 200);
    assert_eq!(result.sensitivities.len(), 1);
    assert_eq!(result.sensitivities[0].var, 0);
}

#[test]
fn bad_request_is_answered_and_loop_continues() {
    let mut input = frame(&[9, 1, 2, 3]);
    input.extend(frame(&solve_request()));

    let (served, responses) = run_worker(input);
    assert_eq!(served.unwrap(), 2);
    assert_eq!(responses[0][0], ResponseStatus::DecodeError as u8);
    assert_eq!(
        String::from_utf8_lossy(&responses[0][1..]),
        "unknown command 9"
    );
    assert_eq!(responses[1][0], ResponseStatus::Ok as u8);
}

#[test]
fn oversized_variable_count_is_rejected_from_header() {
    // command 1, n_vars = 70, nothing else
    let (served, responses) = run_worker(frame(&[1, 70, 0]));
    assert_eq!(served.unwrap(), 1);
    assert_eq!(responses[0][0], ResponseStatus::DecodeError as u8);
    let message = String::from_utf8_lossy(&responses[0][1..]).into_owned();
    assert!(message.contains("n_vars = 70"), "{message}");
}

#[test]
fn scenario_count_above_limit_is_rejected() {
    let mut body = Request::MonteCarlo {
        scenarios: 1,
        model: two_route_model(),
        vars: TWO_ROUTE_VARS.to_vec(),
    }
    .encode();
    body[1..5].copy_from_slice(&10_001u32.to_le_bytes());

    let (_, responses) = run_worker(frame(&body));
    assert_eq!(responses[0][0], ResponseStatus::DecodeError as u8);
}

#[test]
fn truncated_frame_ends_the_connection() {
    let mut input = frame(&solve_request());
    input.truncate(input.len() - 3);
    let (served, responses) = run_worker(input);
    assert!(matches!(served, Err(ProtocolError::Truncated { .. })));
    assert!(responses.is_empty());
}

#[test]
fn descriptor_survives_encode_decode() {
    let mut model = two_route_model();
    model.constraints[1].kind = ConstraintKind::Custom {
        coefficients: vec![2.5],
    };
    model.constraints[0].min_var = Some(8);
    model.perturbations[6] = continuous(12.0, 0.0, 2000.0);
    model.perturbations[7] = continuous(0.1, 0.0, 1.0);
    model.perturbations[6].correlations.push(Correlation {
        var: 7,
        coefficient: -600.0,
    });

    assert_round_trip(&model);
}

fn assert_round_trip(model: &ModelDescriptor) {
    model.validate().unwrap();
    let mut bytes = Vec::new();
    encode_descriptor(model, &mut bytes);
    let mut reader = ByteReader::new(&bytes);
    let decoded = decode_descriptor(&mut reader).unwrap();
    reader.finish().unwrap();
    assert_eq!(&decoded, model);
}

#[test]
fn every_objective_mode_round_trips() {
    for tag in 0..=4 {
        let mut model = two_route_model();
        model.objective = ObjectiveMode::from_tag(tag).unwrap();
        model.risk_lambda = 0.25 * f64::from(tag);
        model.profit_floor = -1_500.0;
        assert_round_trip(&model);
    }
}

#[test]
fn every_constraint_kind_round_trips() {
    let mut model = two_route_model();
    let mut demand = cap(ConstraintKind::Demand, 5, &[0, 1]);
    demand.min_var = Some(8);
    let mut custom = cap(
        ConstraintKind::Custom {
            coefficients: vec![1.5, -0.25],
        },
        4,
        &[1, 0],
    );
    custom.outage = Some(Outage {
        var: 7,
        factor: 0.75,
    });
    model.constraints = vec![
        cap(ConstraintKind::Supply, 4, &[0]),
        demand,
        cap(ConstraintKind::Fleet, 6, &[0, 1]),
        cap(ConstraintKind::Capital, 6, &[]),
        custom,
    ];
    assert_round_trip(&model);
}

#[test]
fn empty_descriptor_round_trips() {
    let model = ModelDescriptor {
        n_vars: 0,
        objective: ObjectiveMode::MaxProfit,
        risk_lambda: 0.0,
        profit_floor: 0.0,
        routes: Vec::new(),
        constraints: Vec::new(),
        perturbations: Vec::new(),
    };
    assert_round_trip(&model);
}

#[test]
fn descriptor_at_every_limit_round_trips() {
    let all_routes: Vec<u8> = (0..MAX_ROUTES as u8).collect();
    let routes: Vec<Route> = (0..MAX_ROUTES as u8)
        .map(|i| Route {
            transit_cost_per_day: f64::from(i) * 3.5,
            base_transit_days: 2.0,
            unit_capacity: 25.0,
            ..route(i, i + 16, i + 32)
        })
        .collect();
    let constraints = (0..MAX_CONSTRAINTS as u8)
        .map(|i| {
            let kind = match i % 5 {
                0 => ConstraintKind::Supply,
                1 => ConstraintKind::Demand,
                2 => ConstraintKind::Fleet,
                3 => ConstraintKind::Capital,
                _ => ConstraintKind::Custom {
                    coefficients: all_routes.iter().map(|&r| f64::from(r) - 7.5).collect(),
                },
            };
            let mut spec = cap(kind, 48 + i % 16, &all_routes);
            if i % 2 == 0 {
                spec.min_var = Some(63 - i);
            }
            if i % 3 == 0 {
                spec.outage = Some(Outage {
                    var: i,
                    factor: 0.5,
                });
            }
            spec
        })
        .collect();
    let perturbations = (0..MAX_VARS)
        .map(|v| {
            let mut p = if v % 4 == 0 {
                Perturbation::fixed()
            } else {
                continuous(0.1 * v as f64, -10.0, 1e6)
            };
            p.correlations = (0..MAX_CORRELATIONS)
                .map(|k| Correlation {
                    var: ((v + k + 1) % MAX_VARS) as u8,
                    coefficient: k as f64 * 0.125 - 0.5,
                })
                .collect();
            p
        })
        .collect();
    let model = ModelDescriptor {
        n_vars: MAX_VARS,
        objective: ObjectiveMode::MaxRoi,
        risk_lambda: 1.0,
        profit_floor: 10.0,
        routes,
        constraints,
        perturbations,
    };
    assert_round_trip(&model);
}
