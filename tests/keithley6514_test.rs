//! Keithley 6514 driver tests against the in-memory transport.

use electrometer_daq::instrument::keithley6514::{
    legal_ranges, unit_for, ArmSource, Keithley6514, Mode, TriggerMode,
};
use electrometer_daq::instrument::{read_quantity, Electrometer};
use electrometer_daq::property::ScpiEnum;
use electrometer_daq::transport::{MockTransport, TransportCall};
use electrometer_daq::units::{PhysicalUnit, Prefix, Quantity};
use electrometer_daq::ElectrometerError;

fn send(command: &str) -> TransportCall {
    TransportCall::Send(command.to_string())
}

fn query(command: &str) -> TransportCall {
    TransportCall::Query(command.to_string())
}

#[test]
fn test_mode_round_trip() {
    let handle = MockTransport::new();
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    for &mode in Mode::ALL {
        meter.set_mode(mode).unwrap();
        assert_eq!(meter.mode().unwrap(), mode);
    }
    assert_eq!(
        handle.sent(),
        vec!["FUNCTION VOLT", "FUNCTION CURR", "FUNCTION RES", "FUNCTION CHAR"]
    );
}

#[test]
fn test_trigger_and_arm_sources_are_independent() {
    let handle = MockTransport::new();
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    for &source in TriggerMode::ALL {
        meter.set_trigger_source(source).unwrap();
        assert_eq!(meter.trigger_source().unwrap(), source);
    }
    for &source in ArmSource::ALL {
        meter.set_arm_source(source).unwrap();
        assert_eq!(meter.arm_source().unwrap(), source);
    }

    meter.set_trigger_source(TriggerMode::Tlink).unwrap();
    meter.set_arm_source(ArmSource::Manual).unwrap();
    assert_eq!(meter.trigger_source().unwrap(), TriggerMode::Tlink);
    assert_eq!(meter.arm_source().unwrap(), ArmSource::Manual);

    let sent = handle.sent();
    assert!(sent.contains(&"TRIGGER:SOURCE TLINK".to_string()));
    assert!(sent.contains(&"ARM:SOURCE MAN".to_string()));
}

#[test]
fn test_zero_check_and_correct_round_trip() {
    let handle = MockTransport::new();
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    for value in [true, false] {
        meter.set_zero_check(value).unwrap();
        assert_eq!(meter.zero_check().unwrap(), value);
        meter.set_zero_correct(!value).unwrap();
        assert_eq!(meter.zero_correct().unwrap(), !value);
    }
    assert_eq!(
        handle.sent(),
        vec!["SYST:ZCH ON", "SYST:ZCOR OFF", "SYST:ZCH OFF", "SYST:ZCOR ON"]
    );
}

#[test]
fn test_unrecognized_mode_token_is_protocol_error() {
    let mut transport = MockTransport::new().with_response("FUNCTION?", "\"CURR:DC\"");
    let mut meter = Keithley6514::new(&mut transport);
    match meter.mode() {
        Err(ElectrometerError::Protocol { command, response }) => {
            assert_eq!(command, "FUNCTION?");
            assert_eq!(response, "\"CURR:DC\"");
        }
        other => panic!("expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_set_range_in_current_mode() {
    let handle = MockTransport::new().with_response("FUNCTION?", "CURR");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    meter.set_input_range(Quantity::amperes(2e-9)).unwrap();
    assert_eq!(
        handle.calls(),
        vec![query("FUNCTION?"), send("CURR:RANGE:LOWER 2.000000e-09")]
    );
}

#[test]
fn test_illegal_range_is_rejected_before_sending() {
    let handle = MockTransport::new().with_response("FUNCTION?", "CURR");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    let err = meter.set_input_range(Quantity::amperes(3e-9)).unwrap_err();
    assert!(matches!(err, ElectrometerError::Range { mode: Mode::Current, .. }));
    assert!(handle.sent().is_empty());
}

#[test]
fn test_range_a_few_ulps_off_is_rejected() {
    let handle = MockTransport::new().with_response("FUNCTION?", "CURR");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    let err = meter
        .set_input_range(Quantity::amperes(2e-9 * (1.0 + 5e-13)))
        .unwrap_err();
    assert!(matches!(err, ElectrometerError::Range { mode: Mode::Current, .. }));
    assert!(handle.sent().is_empty());
}

#[test]
fn test_wrong_unit_is_rejected_before_sending() {
    let handle = MockTransport::new().with_response("FUNCTION?", "RES");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    let err = meter.set_input_range(Quantity::volts(2.0)).unwrap_err();
    assert!(matches!(
        err,
        ElectrometerError::UnitMismatch {
            expected: PhysicalUnit::Ohm,
            found: PhysicalUnit::Volt
        }
    ));
    assert!(handle.sent().is_empty());
}

#[test]
fn test_range_is_validated_against_mode_at_call_time() {
    let handle = MockTransport::new();
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    meter.set_mode(Mode::Voltage).unwrap();
    meter.set_input_range(Quantity::volts(20.0)).unwrap();

    meter.set_mode(Mode::Charge).unwrap();
    handle.clear_log();
    assert!(meter.set_input_range(Quantity::volts(20.0)).is_err());
    meter
        .set_input_range(Quantity::with_prefix(20.0, Prefix::Nano, PhysicalUnit::Coulomb))
        .unwrap();
    assert_eq!(handle.sent(), vec!["CHAR:RANGE:LOWER 2.000000e-08"]);
}

#[test]
fn test_every_legal_range_is_accepted() {
    for &mode in Mode::ALL {
        let handle = MockTransport::new().with_response("FUNCTION?", mode.token());
        let mut transport = handle.clone();
        let mut meter = Keithley6514::new(&mut transport);
        for &range in legal_ranges(mode) {
            meter
                .set_input_range(Quantity::new(range, unit_for(mode)))
                .unwrap();
        }
        assert_eq!(handle.sent().len(), legal_ranges(mode).len());
    }
}

#[test]
fn test_input_range_reads_upper_node() {
    let handle = MockTransport::new()
        .with_response("FUNCTION?", "CHAR")
        .with_response("CHAR:RANGE:UPPER?", "2.000000E-06");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    assert_eq!(meter.input_range().unwrap(), Quantity::coulombs(2e-6));
    assert_eq!(
        handle.calls(),
        vec![query("FUNCTION?"), query("CHAR:RANGE:UPPER?")]
    );
}

#[test]
fn test_auto_range_getter() {
    let mut transport = MockTransport::new()
        .with_response("FUNCTION?", "VOLT")
        .with_response("VOLT:RANGE:AUTO?", " ON\r\n");
    let mut meter = Keithley6514::new(&mut transport);
    assert!(meter.auto_range().unwrap());

    let mut transport = MockTransport::new()
        .with_response("FUNCTION?", "VOLT")
        .with_response("VOLT:RANGE:AUTO?", "OFF");
    let mut meter = Keithley6514::new(&mut transport);
    assert!(!meter.auto_range().unwrap());
}

#[test]
fn test_auto_range_setter_with_legal_range() {
    let handle = MockTransport::new()
        .with_response("FUNCTION?", "CURR")
        .with_response("CURR:RANGE:UPPER?", "2.000000E-09");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    meter.set_auto_range(true).unwrap();
    meter.set_auto_range(false).unwrap();
    assert_eq!(
        handle.sent(),
        vec!["CURR:RANGE AUTO ON", "CURR:RANGE AUTO OFF"]
    );
}

#[test]
fn test_auto_range_setter_rejects_illegal_current_range() {
    let handle = MockTransport::new()
        .with_response("FUNCTION?", "CURR")
        .with_response("CURR:RANGE:UPPER?", "2.100000E-02");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    assert!(matches!(
        meter.set_auto_range(true),
        Err(ElectrometerError::Range { .. })
    ));
    assert!(handle.sent().is_empty());
}

#[test]
fn test_auto_config_sends_single_command() {
    let handle = MockTransport::new();
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    meter.auto_config(Mode::Voltage).unwrap();
    assert_eq!(handle.calls(), vec![send("CONF:VOLT")]);
}

#[test]
fn test_fetch_never_triggers() {
    let handle = MockTransport::new().with_response("FETC?", "+1.500000E-10,+1.000000E+01,+0");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    let reading = meter.fetch().unwrap();
    assert_eq!(reading.value, 1.5e-10);
    assert_eq!(reading.timestamp, Some(10.0));
    assert_eq!(handle.calls(), vec![query("FETC?")]);
    assert!(handle
        .calls()
        .iter()
        .all(|call| !call.command().starts_with("READ") && !call.command().starts_with("INIT")));
}

#[test]
fn test_read_triggers_exactly_once() {
    let handle = MockTransport::new().with_response("READ?", "-4.200000E+00");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    assert_eq!(meter.read().unwrap().value, -4.2);
    assert_eq!(handle.calls(), vec![query("READ?")]);
}

#[test]
fn test_transport_failure_is_propagated() {
    let handle = MockTransport::new().with_response("FUNCTION?", "CURR");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    handle.fail_next();
    assert!(matches!(
        meter.set_input_range(Quantity::amperes(2e-9)),
        Err(ElectrometerError::Transport(_))
    ));
    assert!(handle.sent().is_empty());
}

#[test]
fn test_read_quantity_uses_active_unit() {
    let handle = MockTransport::new()
        .with_response("FUNCTION?", "CURR")
        .with_response("READ?", "+2.000000E-12");
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);

    let quantity = read_quantity(&mut meter).unwrap();
    assert_eq!(quantity, Quantity::amperes(2e-12));
    assert_eq!(handle.calls(), vec![query("FUNCTION?"), query("READ?")]);
}

#[test]
fn test_driver_through_capability_trait() {
    fn configure<E: Electrometer<Mode = Mode>>(meter: &mut E) -> Result<(), ElectrometerError> {
        meter.set_mode(Mode::Resistance)?;
        meter.set_zero_check(false)?;
        meter.set_input_range("2 MOhm".parse()?)
    }

    let handle = MockTransport::new();
    let mut transport = handle.clone();
    let mut meter = Keithley6514::new(&mut transport);
    configure(&mut meter).unwrap();

    assert_eq!(
        handle.sent(),
        vec!["FUNCTION RES", "SYST:ZCH OFF", "RES:RANGE:LOWER 2.000000e+06"]
    );
}
