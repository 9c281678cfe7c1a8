// Domain operation tests against the scripted in-memory agent.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;

use apcpdu_core::oids::{self, Concept};
use apcpdu_core::{
    CoreError, LoadState, OutletIndex, Pdu, PowerCommand, PowerState, decode_deci_amps,
};
use apcpdu_snmp::mock::{Call, MockTransport};
use apcpdu_snmp::{Error, Oid, Session, Value, Varbind};

// ── Helpers ─────────────────────────────────────────────────────────

fn outlet(n: u32) -> OutletIndex {
    OutletIndex::new(n).unwrap()
}

fn name_oid(n: u32) -> Oid {
    oids::resolve(Concept::OutletName, Some(outlet(n)))
}

fn state_oid(n: u32) -> Oid {
    oids::resolve(Concept::OutletPowerState, Some(outlet(n)))
}

fn scalar(concept: Concept) -> Oid {
    oids::resolve(concept, None)
}

/// An eight-outlet rack PDU with a few named outlets.
fn rack_pdu() -> MockTransport {
    let names = [
        "web-01", "web-02", "db-01", "db-02", "cache-01", "spare", "switch-a", "switch-b",
    ];
    let mock = MockTransport::new()
        .with_object(scalar(Concept::OutletCount), 8)
        .with_object(scalar(Concept::PowerDraw), Value::Gauge32(125))
        .with_object(scalar(Concept::LowLoadThreshold), 0)
        .with_object(scalar(Concept::NearOverloadThreshold), 130)
        .with_object(scalar(Concept::OverloadThreshold), 160)
        .with_object(scalar(Concept::LoadState), 1);
    for (i, name) in (1..).zip(names) {
        mock.insert(name_oid(i), name);
        mock.insert(state_oid(i), if i == 6 { 2 } else { 1 });
    }
    mock
}

fn pdu(mock: &MockTransport) -> Pdu<MockTransport> {
    Pdu::new(Session::new(mock.clone(), Duration::from_secs(1)))
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_total_outlets_reads_count() {
    let mock = MockTransport::new().with_object(scalar(Concept::OutletCount), 24);
    assert_eq!(pdu(&mock).total_outlets().await.unwrap(), 24);
    assert_eq!(
        mock.calls(),
        vec![Call::Get(vec![scalar(Concept::OutletCount)])]
    );
}

#[tokio::test]
async fn test_power_draw_is_scaled_to_amps() {
    let mock = rack_pdu();
    let draw = pdu(&mock).power_draw().await.unwrap();
    assert!((draw - 12.5).abs() < f64::EPSILON, "got {draw}");
}

#[test]
fn test_decode_deci_amps_divides_by_ten() {
    for raw in [0_u32, 1, 9, 10, 125, 1600, 65_535] {
        assert!((decode_deci_amps(raw) - f64::from(raw) / 10.0).abs() < f64::EPSILON);
    }
}

#[tokio::test]
async fn test_thresholds_individually_and_aggregated() {
    let mock = rack_pdu();
    let pdu = pdu(&mock);

    let low = pdu.low_load_threshold().await.unwrap();
    let near = pdu.near_overload_threshold().await.unwrap();
    let over = pdu.overload_threshold().await.unwrap();
    assert!(low.abs() < f64::EPSILON);
    assert!((near - 13.0).abs() < f64::EPSILON);
    assert!((over - 16.0).abs() < f64::EPSILON);

    let all = pdu.load_thresholds().await.unwrap();
    assert!((all.low - low).abs() < f64::EPSILON);
    assert!((all.near_overload - near).abs() < f64::EPSILON);
    assert!((all.overload - over).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_load_state_decodes_known_codes() {
    let mock = rack_pdu();
    mock.insert(scalar(Concept::LoadState), 3);
    assert_eq!(
        pdu(&mock).load_state().await.unwrap(),
        LoadState::NearOverload
    );
}

#[tokio::test]
async fn test_load_state_out_of_range_is_decode_error() {
    let mock = rack_pdu();
    mock.insert(scalar(Concept::LoadState), 5);
    let err = pdu(&mock).load_state().await.unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_outlet_name_and_state() {
    let mock = rack_pdu();
    let pdu = pdu(&mock);
    assert_eq!(pdu.outlet_name(outlet(3)).await.unwrap(), "db-01");
    assert_eq!(pdu.outlet_power_state(outlet(6)).await.unwrap(), PowerState::OFF);
}

#[tokio::test]
async fn test_extended_power_state_is_not_normalized() {
    let mock = rack_pdu();
    mock.insert(state_oid(2), 5);
    let state = pdu(&mock).outlet_power_state(outlet(2)).await.unwrap();
    assert_eq!(state.code(), 5);
    assert!(!state.is_on());
}

#[tokio::test]
async fn test_outlet_past_count_is_no_such_object() {
    let mock = rack_pdu();
    let err = pdu(&mock).outlet_name(outlet(9)).await.unwrap_err();
    assert!(
        matches!(&err, CoreError::NoSuchObject { oid } if *oid == name_oid(9)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_v2c_exception_value_is_no_such_object() {
    let mock = rack_pdu();
    mock.push_get_reply(Ok(vec![Varbind::new(name_oid(40), Value::NoSuchInstance)]));
    let err = pdu(&mock).outlet_name(outlet(40)).await.unwrap_err();
    assert!(matches!(err, CoreError::NoSuchObject { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_wrong_type_is_decode_error() {
    let mock = rack_pdu();
    mock.insert(scalar(Concept::OutletCount), "eight");
    let err = pdu(&mock).total_outlets().await.unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_opaque_outlet_name_is_decode_error() {
    let mock = rack_pdu();
    mock.insert(name_oid(3), Value::Opaque(b"db-01".to_vec()));
    let err = pdu(&mock).outlet_name(outlet(3)).await.unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_get_by_oid_returns_raw_value() {
    let mock = rack_pdu();
    let value = pdu(&mock).get_by_oid(".1.1.12.1.8.0").await.unwrap();
    assert_eq!(value, Value::Integer(8));
}

// ── Response shape ──────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_response_is_invalid_shape() {
    let mock = rack_pdu();
    mock.push_get_reply(Ok(vec![]));
    let err = pdu(&mock).total_outlets().await.unwrap_err();
    assert!(
        matches!(err, CoreError::InvalidResponseShape { expected: 1, actual: 0, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_extra_varbinds_are_invalid_shape() {
    let mock = rack_pdu();
    let oid = scalar(Concept::PowerDraw);
    mock.push_get_reply(Ok(vec![
        Varbind::new(oid.clone(), 125),
        Varbind::new(oid, 125),
    ]));
    let err = pdu(&mock).power_draw().await.unwrap_err();
    assert!(
        matches!(err, CoreError::InvalidResponseShape { actual: 2, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_every_scalar_read_checks_shape() {
    let mock = rack_pdu();
    let pdu = pdu(&mock);

    for _ in 0..7 {
        mock.push_get_reply(Ok(vec![]));
    }
    let results = [
        pdu.total_outlets().await.map(drop),
        pdu.outlet_name(outlet(1)).await.map(drop),
        pdu.outlet_power_state(outlet(1)).await.map(drop),
        pdu.power_draw().await.map(drop),
        pdu.low_load_threshold().await.map(drop),
        pdu.overload_threshold().await.map(drop),
        pdu.load_state().await.map(drop),
    ];
    for result in results {
        assert!(
            matches!(result, Err(CoreError::InvalidResponseShape { .. })),
            "got {result:?}"
        );
    }
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_power_state_round_trip() {
    let mock = rack_pdu();
    let pdu = pdu(&mock);

    pdu.set_power_state(outlet(6), true).await.unwrap();
    assert_eq!(pdu.outlet_power_state(outlet(6)).await.unwrap().code(), 1);

    pdu.set_power_state(outlet(6), false).await.unwrap();
    assert_eq!(pdu.outlet_power_state(outlet(6)).await.unwrap().code(), 2);

    assert!(mock.calls().contains(&Call::Set(state_oid(6), Value::Integer(1))));
    assert!(mock.calls().contains(&Call::Set(state_oid(6), Value::Integer(2))));
}

#[tokio::test]
async fn test_raw_power_command_passes_through() {
    let mock = rack_pdu();
    pdu(&mock).set_power_state(outlet(1), 3).await.unwrap();
    assert_eq!(mock.object(&state_oid(1)), Some(Value::Integer(3)));
}

#[tokio::test]
async fn test_negative_raw_command_is_rejected_locally() {
    let mock = rack_pdu();
    let err = pdu(&mock)
        .set_power_state(outlet(1), PowerCommand::Raw(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }), "got {err:?}");
    assert_eq!(mock.set_count(), 0);
}

#[tokio::test]
async fn test_mismatched_confirmation_is_rejected_change() {
    let mock = rack_pdu();
    mock.push_set_reply(Ok(vec![Varbind::new(state_oid(2), 2)]));
    let err = pdu(&mock)
        .set_power_state(outlet(2), PowerCommand::On)
        .await
        .unwrap_err();
    assert!(
        matches!(&err, CoreError::DeviceRejectedChange { requested, confirmed, .. }
            if requested == "1" && confirmed == "2"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_set_without_confirmation_is_invalid_shape() {
    let mock = rack_pdu();
    mock.push_set_reply(Ok(vec![]));
    let err = pdu(&mock).set_power_state(outlet(2), true).await.unwrap_err();
    assert!(
        matches!(err, CoreError::InvalidResponseShape { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_rename_outlet() {
    let mock = rack_pdu();
    let pdu = pdu(&mock);
    pdu.set_outlet_name(outlet(6), "backup-nas").await.unwrap();
    assert_eq!(pdu.outlet_name(outlet(6)).await.unwrap(), "backup-nas");
}

#[tokio::test]
async fn test_rename_echoed_as_opaque_is_rejected_change() {
    let mock = rack_pdu();
    mock.push_set_reply(Ok(vec![Varbind::new(
        name_oid(6),
        Value::Opaque(b"backup-nas".to_vec()),
    )]));
    let err = pdu(&mock)
        .set_outlet_name(outlet(6), "backup-nas")
        .await
        .unwrap_err();
    assert!(
        matches!(&err, CoreError::DeviceRejectedChange { requested, .. }
            if requested == "backup-nas"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_long_name_is_rejected_before_sending() {
    let mock = rack_pdu();
    let name = "a".repeat(21);
    let err = pdu(&mock)
        .set_outlet_name(outlet(1), &name)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }), "got {err:?}");
    assert_eq!(mock.set_count(), 0);
}

#[tokio::test]
async fn test_twenty_character_name_is_accepted() {
    let mock = rack_pdu();
    let name = "b".repeat(20);
    pdu(&mock).set_outlet_name(outlet(1), &name).await.unwrap();
    assert_eq!(mock.set_count(), 1);
}

// ── Enumeration ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_enumerated_names_match_individual_fetches() {
    let mock = rack_pdu();
    let pdu = pdu(&mock);

    let names = pdu.all_outlet_names().await.unwrap();
    let count = pdu.total_outlets().await.unwrap();
    assert_eq!(names.len(), usize::try_from(count).unwrap());

    for i in 1..=count {
        let single = pdu.outlet_name(outlet(i)).await.unwrap();
        assert_eq!(names.get_outlet(outlet(i)), Some(&single));
    }
    assert!(mock
        .calls()
        .contains(&Call::Walk(oids::column(Concept::OutletName), 30)));
}

#[tokio::test]
async fn test_enumeration_is_sorted_regardless_of_walk_order() {
    let mock = MockTransport::new();
    mock.push_walk_reply(Ok(vec![
        Varbind::new(name_oid(10), "j"),
        Varbind::new(name_oid(2), "b"),
        Varbind::new(name_oid(1), "a"),
    ]));
    let names = pdu(&mock).all_outlet_names().await.unwrap();
    let keys: Vec<String> = names.keys().map(ToString::to_string).collect();
    assert_eq!(keys, ["1", "2", "10"]);
}

#[tokio::test]
async fn test_enumerated_power_states() {
    let mock = rack_pdu();
    let states = pdu(&mock).all_outlet_power_states().await.unwrap();
    assert_eq!(states.len(), 8);
    assert_eq!(states.get("6"), Some(&PowerState::OFF));
    assert!(states.values().filter(|s| s.is_on()).count() == 7);
}

#[tokio::test]
async fn test_enumeration_decode_failure_yields_no_partial_map() {
    let mock = MockTransport::new();
    mock.push_walk_reply(Ok(vec![
        Varbind::new(state_oid(1), 1),
        Varbind::new(state_oid(2), -3),
    ]));
    let err = pdu(&mock).all_outlet_power_states().await.unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_enumeration_walk_error_propagates() {
    let mock = MockTransport::new();
    mock.push_walk_reply(Err(Error::WalkAborted {
        root: oids::column(Concept::OutletName),
        reason: "OID not increasing".into(),
    }));
    let err = pdu(&mock).all_outlet_names().await.unwrap_err();
    assert!(matches!(err, CoreError::Protocol(_)), "got {err:?}");
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_operations_after_close_fail() {
    let mock = rack_pdu();
    let pdu = pdu(&mock);
    pdu.close().await.unwrap();

    assert!(matches!(
        pdu.total_outlets().await,
        Err(CoreError::SessionClosed)
    ));
    assert!(matches!(
        pdu.set_power_state(outlet(1), true).await,
        Err(CoreError::SessionClosed)
    ));
    assert!(matches!(
        pdu.all_outlet_names().await,
        Err(CoreError::SessionClosed)
    ));
    assert!(matches!(pdu.close().await, Err(CoreError::SessionClosed)));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_surfaces_and_next_call_succeeds() {
    let mock = rack_pdu();
    mock.push_get_pending();
    let pdu = pdu(&mock);

    let err = pdu.total_outlets().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(matches!(err, CoreError::Protocol(_)));

    assert_eq!(pdu.total_outlets().await.unwrap(), 8);
}
