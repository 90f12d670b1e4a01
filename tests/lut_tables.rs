use houghcircles::lowlevel::Offset;
use houghcircles::{HoughError, LookupTable, LutConfig, LutReference};

fn cfg(min: usize, max: usize, inc: usize, resolution: usize) -> LutConfig {
    LutConfig {
        radius_min: min,
        radius_max: max,
        radius_inc: inc,
        resolution,
        dedup: false,
        reference: LutReference::Largest,
    }
}

#[test]
fn building_twice_gives_identical_tables() {
    let config = LutConfig {
        dedup: true,
        ..cfg(3, 21, 3, 500)
    };
    let a = LookupTable::build(&config).unwrap();
    let b = LookupTable::build(&config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn four_step_table_hits_the_axes() {
    let lut = LookupTable::build(&cfg(5, 9, 2, 4)).unwrap();
    assert_eq!(lut.lut_size(), 4);
    for (idx, r) in lut.radii().iter().enumerate() {
        let r = r as i32;
        let mut got = lut.offsets(idx).to_vec();
        got.sort_by_key(|o| (o.dx, o.dy));
        let mut expected = vec![
            Offset { dx: r, dy: 0 },
            Offset { dx: 0, dy: r },
            Offset { dx: -r, dy: 0 },
            Offset { dx: 0, dy: -r },
        ];
        expected.sort_by_key(|o| (o.dx, o.dy));
        assert_eq!(got, expected);
    }
}

#[test]
fn offsets_stay_on_the_ring() {
    let lut = LookupTable::build(&cfg(4, 40, 4, 256)).unwrap();
    for (idx, r) in lut.radii().iter().enumerate() {
        for o in lut.offsets(idx) {
            let dist = f64::from(o.dx * o.dx + o.dy * o.dy).sqrt();
            assert!((dist - r as f64).abs() <= 0.75, "r={r} offset={o:?}");
        }
    }
}

#[test]
fn dedup_uses_reference_radius_count() {
    let smallest = LookupTable::build(&LutConfig {
        dedup: true,
        reference: LutReference::Smallest,
        ..cfg(3, 30, 3, 720)
    })
    .unwrap();
    let largest = LookupTable::build(&LutConfig {
        dedup: true,
        reference: LutReference::Largest,
        ..cfg(3, 30, 3, 720)
    })
    .unwrap();

    // A small ring has far fewer distinct pixels than a large one.
    assert!(smallest.lut_size() < largest.lut_size());
    assert!(largest.lut_size() <= 720);
    for lut in [&smallest, &largest] {
        for idx in 0..lut.radii().len() {
            assert_eq!(lut.offsets(idx).len(), lut.lut_size());
        }
    }
}

#[test]
fn dedup_is_a_no_op_for_coarse_resolution() {
    let plain = LookupTable::build(&cfg(20, 20, 1, 16)).unwrap();
    let deduped = LookupTable::build(&LutConfig {
        dedup: true,
        ..cfg(20, 20, 1, 16)
    })
    .unwrap();
    assert_eq!(plain, deduped);
}

#[test]
fn rejects_non_dividing_increment() {
    let err = LookupTable::build(&cfg(10, 25, 4, 100)).unwrap_err();
    assert_eq!(
        err,
        HoughError::RadiusIncrement {
            radius_min: 10,
            radius_max: 25,
            radius_inc: 4,
        }
    );
}

#[test]
fn rejects_zero_resolution() {
    let err = LookupTable::build(&cfg(10, 20, 2, 0)).unwrap_err();
    assert!(matches!(err, HoughError::InvalidConfig { .. }));
}

#[test]
fn out_of_range_radius_index_is_an_error() {
    let lut = LookupTable::build(&cfg(10, 20, 5, 8)).unwrap();
    assert!(lut.try_offsets(2).is_ok());
    assert_eq!(
        lut.try_offsets(3).unwrap_err(),
        HoughError::IndexOutOfBounds {
            index: 3,
            len: 3,
            context: "radius",
        }
    );
}
