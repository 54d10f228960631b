use brine_nsd::{DecodeError, EncodeError};
use example_app::showcase::{Collections, Color, Empty, Mood, Optionals, Point, Primitives, Scene, M};

fn scenario() -> M {
    M::new(5, None, vec![1, 2])
}

const SCENARIO_BYTES: [u8; 18] = [
    0, 0, 5, 0, 0, 0, // x
    2, 0, 2, 0, 1, 0, 0, 0, 2, 0, 0, 0, // ys
];

fn full_scene() -> Scene {
    let leaf = Scene {
        name: "leaf".to_string(),
        mood: Mood::Angry,
        ..Default::default()
    };

    Scene::new(
        "root 🍕".to_string(),
        Point::new(1.0, -2.5),
        Some(Point::new(0.5, 0.25)),
        Collections::new(
            vec![1, -1, i32::MAX],
            vec!["a".to_string(), String::new(), "ünï".to_string()],
            vec![Color::Blue, Color::Red],
            vec![Point::new(3.0, 4.0)],
            Some(vec![0.1, 0.2]),
            Some(vec![]),
            Some(vec![Point::default(), Point::new(-1.0, 1.0)]),
            None,
        ),
        Empty::new(),
        vec![leaf.clone(), leaf],
        Mood::Calm,
        Some(Optionals {
            flag: Some(true),
            small: Some(255),
            tiny: Some(-128),
            medium: Some(-300),
            wide: Some(65535),
            large: Some(-70000),
            unsigned: Some(u32::MAX),
            huge: Some(i64::MIN),
            giant: Some(u64::MAX),
            single: Some(1.5),
            precise: Some(-2.25),
            text: Some("optional".to_string()),
            letter: Some(0x41),
            color: Some(Color::Green),
            point: Some(Point::new(7.0, 8.0)),
        }),
    )
}

#[test]
fn scenario_encodes_to_exact_bytes() {
    let m = scenario();
    assert_eq!(M::MIN_SIZE, 10);
    assert_eq!(m.total_size(), 18);

    let bytes = m.serialize().unwrap();
    assert_eq!(bytes, SCENARIO_BYTES);
}

#[test]
fn absent_optional_is_omitted() {
    let bytes = scenario().serialize().unwrap();
    assert_eq!(&bytes[6..8], &[M::YS_ID as u8, 0]);

    let decoded = M::deserialize(&bytes, 0, bytes.len()).unwrap();
    assert_eq!(decoded.note, None);
}

#[test]
fn present_optional_carries_presence_byte() {
    let m = M::new(5, Some("hi".to_string()), vec![]);
    assert_eq!(m.total_size(), 19);
    assert_eq!(
        m.serialize().unwrap(),
        vec![0, 0, 5, 0, 0, 0, 1, 0, 1, 2, 0, b'h', 0, b'i', 0, 2, 0, 0, 0]
    );
}

#[test]
fn round_trip_every_shape() {
    let scene = full_scene();
    let bytes = scene.serialize().unwrap();
    assert_eq!(bytes.len(), scene.total_size());
    assert_eq!(Scene::deserialize(&bytes, 0, bytes.len()).unwrap(), scene);
}

#[test]
fn size_law_holds_for_defaults() {
    assert_eq!(Empty::MIN_SIZE, 0);
    assert_eq!(Empty::new().serialize().unwrap(), Vec::<u8>::new());

    assert_eq!(Optionals::MIN_SIZE, 0);
    assert_eq!(Optionals::default().serialize().unwrap(), Vec::<u8>::new());
    assert_eq!(Optionals::deserialize(&[], 0, 0).unwrap(), Optionals::default());

    assert_eq!(Point::MIN_SIZE, 12);
    assert_eq!(Point::new(1.0, 2.0).total_size(), Point::MIN_SIZE);

    assert_eq!(Primitives::MIN_SIZE, 73);
    let primitives = Primitives::default();
    assert_eq!(primitives.serialize().unwrap().len(), primitives.total_size());

    for scene in [Scene::default(), full_scene()] {
        assert_eq!(scene.serialize().unwrap().len(), scene.total_size());
    }
}

#[test]
fn field_order_does_not_matter() {
    let permuted = [
        2, 0, 2, 0, 1, 0, 0, 0, 2, 0, 0, 0, // ys
        0, 0, 5, 0, 0, 0, // x
    ];
    assert_eq!(M::deserialize(&permuted, 0, permuted.len()).unwrap(), scenario());
}

#[test]
fn first_occurrence_of_a_field_wins() {
    let mut bytes = SCENARIO_BYTES.to_vec();
    bytes.extend_from_slice(&[0, 0, 9, 0, 0, 0]);

    let mut m = M::default();
    assert_eq!(m.unpack(&bytes, 0, bytes.len()).unwrap(), bytes.len());
    assert_eq!(m, scenario());
}

#[test]
fn repeated_nested_message_is_skipped() {
    let record = |point: Point| {
        let body = point.serialize().unwrap();
        let mut bytes = vec![Scene::ORIGIN_ID as u8, 0, body.len() as u8, 0];
        bytes.extend(body);
        bytes
    };
    let mut bytes = record(Point::new(1.0, 2.0));
    bytes.extend(record(Point::new(3.0, 4.0)));
    assert_eq!(&bytes[..8], &[1, 0, 12, 0, 0, 0, 0, 0]);

    let scene = Scene::deserialize(&bytes, 0, bytes.len()).unwrap();
    assert_eq!(scene.origin, Point::new(1.0, 2.0));
}

#[test]
fn unpack_populates_in_place() {
    let mut m = M::new(1, Some("keep".to_string()), vec![7]);
    let consumed = m.unpack(&SCENARIO_BYTES, 0, SCENARIO_BYTES.len()).unwrap();
    assert_eq!(consumed, 18);
    assert_eq!(m.x, 5);
    assert_eq!(m.ys, vec![1, 2]);
    assert_eq!(m.note.as_deref(), Some("keep"));
}

#[test]
fn unknown_field_id_is_an_error() {
    let bytes = [9, 0, 1, 0, 0, 0];
    assert_eq!(
        M::deserialize(&bytes, 0, bytes.len()),
        Err(DecodeError::UnknownField { id: 9, position: 0 })
    );
}

#[test]
fn truncated_input_is_an_error() {
    let result = M::deserialize(&SCENARIO_BYTES[..15], 0, 15);
    assert!(matches!(result, Err(DecodeError::UnexpectedEof { .. })), "{:?}", result);

    let result = M::deserialize(&SCENARIO_BYTES, 10, 18);
    assert!(matches!(result, Err(DecodeError::OutOfBounds { .. })), "{:?}", result);
}

#[test]
fn serialize_into_an_offset() {
    let m = scenario();
    let mut buffer = vec![0u8; 4 + 18];
    assert_eq!(m.serialize_into(&mut buffer, 4), Ok(18));
    assert_eq!(&buffer[..4], &[0, 0, 0, 0]);
    assert_eq!(&buffer[4..], &SCENARIO_BYTES);

    let mut decoded = M::default();
    assert_eq!(decoded.unpack(&buffer, 4, 18), Ok(18));
    assert_eq!(decoded, m);

    let mut small = vec![0u8; 10];
    assert_eq!(
        m.serialize_into(&mut small, 0),
        Err(EncodeError::BufferTooSmall {
            offset:    0,
            needed:    18,
            available: 10,
        })
    );
}

#[test]
fn enums_use_their_declared_values() {
    assert_eq!(i32::from(Color::Blue), 4);
    assert_eq!(Color::try_from(2), Ok(Color::Green));
    assert_eq!(Color::default(), Color::Red);
    assert_eq!(Mood::default(), Mood::Calm);
    assert_eq!(i32::from(Mood::Angry), -1);

    // Optionals.color = Some(3), which Color does not define.
    let bytes = [Optionals::COLOR_ID as u8, 0, 1, 3, 0, 0, 0];
    assert_eq!(
        Optionals::deserialize(&bytes, 0, bytes.len()),
        Err(DecodeError::UnknownEnumValue {
            type_name: "Color",
            value:     3,
        })
    );
}

#[test]
fn strings_are_utf16() {
    let primitives = Primitives {
        text: "🍕é".to_string(),
        letter: 0xd83c,
        ..Default::default()
    };
    assert_eq!(primitives.total_size(), Primitives::MIN_SIZE + 3 * 2);

    let bytes = primitives.serialize().unwrap();
    let decoded = Primitives::deserialize(&bytes, 0, bytes.len()).unwrap();
    assert_eq!(decoded.text, "🍕é");
    assert_eq!(decoded.letter, 0xd83c);
}

#[test]
fn float_bits_survive() {
    let primitives = Primitives {
        single: -0.0,
        precise: f64::from_bits(1),
        ..Default::default()
    };
    let bytes = primitives.serialize().unwrap();
    let decoded = Primitives::deserialize(&bytes, 0, bytes.len()).unwrap();
    assert_eq!(decoded.single.to_bits(), (-0.0f32).to_bits());
    assert_eq!(decoded.precise.to_bits(), 1);
}

#[test]
fn long_arrays_overflow_the_length_header() {
    let m = M::new(0, None, vec![0; 65536]);
    assert_eq!(m.serialize(), Err(EncodeError::LengthOverflow { length: 65536 }));
}
