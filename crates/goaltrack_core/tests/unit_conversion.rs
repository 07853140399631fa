use goaltrack_core::{convert, ConversionError, DistanceUnit, GoalType, Measurement, Unit, VolumeUnit};

fn all_units() -> Vec<Unit> {
    GoalType::ALL
        .into_iter()
        .flat_map(|goal_type| goal_type.units())
        .collect()
}

#[test]
fn converting_there_and_back_returns_original_value() {
    let samples = [0.001, 1.0, 3.5, 42.195, 10_000.0];

    for from in all_units() {
        for to in all_units().into_iter().filter(|to| to.domain() == from.domain()) {
            for value in samples {
                let there = convert(value, from, to).unwrap();
                let back = convert(there, to, from).unwrap();
                let tolerance = 1e-9 * value.abs().max(1.0);
                assert!(
                    (back - value).abs() <= tolerance,
                    "{value} {from} -> {to} -> {from} gave {back}"
                );
            }
        }
    }
}

#[test]
fn same_unit_conversion_is_identity() {
    for unit in all_units() {
        assert_eq!(convert(0.1, unit, unit).unwrap().to_bits(), 0.1f64.to_bits());
    }
}

#[test]
fn known_factors() {
    let km = convert(1.0, DistanceUnit::Miles.into(), DistanceUnit::Kilometers.into()).unwrap();
    assert!((km - 1.609344).abs() < 1e-12);

    let feet = convert(1.0, DistanceUnit::Meters.into(), DistanceUnit::Feet.into()).unwrap();
    assert!((feet - 1.0 / 0.3048).abs() < 1e-12);

    let ounces = convert(1.0, VolumeUnit::Liters.into(), VolumeUnit::Ounces.into()).unwrap();
    assert!((ounces - 1000.0 / 29.5735295625).abs() < 1e-9);
}

#[test]
fn cross_domain_conversion_is_rejected() {
    let from = Unit::from(DistanceUnit::Miles);
    let to = Unit::from(VolumeUnit::Cups);

    assert_eq!(
        convert(1.0, from, to),
        Err(ConversionError::InvalidUnit { from, to })
    );
    assert!(Measurement::new(1.0, from).convert_to(to).is_err());
}

#[test]
fn units_parse_from_aliases_and_names() {
    assert_eq!("mi".parse::<Unit>().unwrap(), Unit::from(DistanceUnit::Miles));
    assert_eq!(" KM ".parse::<Unit>().unwrap(), Unit::from(DistanceUnit::Kilometers));
    assert_eq!("Liters".parse::<Unit>().unwrap(), Unit::from(VolumeUnit::Liters));
    assert!("furlong".parse::<Unit>().is_err());
}

#[test]
fn adjust_value_leaves_out_of_domain_and_non_positive_values() {
    let miles = Unit::from(DistanceUnit::Miles);
    let km = Unit::from(DistanceUnit::Kilometers);
    let cups = Unit::from(VolumeUnit::Cups);

    assert_eq!(GoalType::Water.adjust_value(5.0, miles, km), 5.0);
    assert_eq!(GoalType::Running.adjust_value(0.0, miles, km), 0.0);
    assert_eq!(GoalType::Running.adjust_value(-2.0, miles, km), -2.0);
    assert_eq!(GoalType::Running.adjust_value(5.0, miles, cups), 5.0);

    let adjusted = GoalType::Running.adjust_value(1.0, miles, km);
    assert!((adjusted - 1.609344).abs() < 1e-12);
}
