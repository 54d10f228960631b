// example/src/main.rs

use brine_nsd::{DecodeError, EncodeError};

// Bring the generated types into scope:
use example_app::showcase::{Color, Point, Scene, M};

#[derive(Debug)]
enum DemoError {
    Encode(EncodeError),
    Decode(DecodeError),
}

impl From<EncodeError> for DemoError {
    fn from(err: EncodeError) -> Self {
        DemoError::Encode(err)
    }
}

impl From<DecodeError> for DemoError {
    fn from(err: DecodeError) -> Self {
        DemoError::Decode(err)
    }
}

fn main() -> Result<(), DemoError> {
    // `note` is absent, so its field record is left out entirely.
    let m = M::new(5, None, vec![1, 2]);
    let bytes = m.serialize()?;
    println!("M        = {:?}", m);
    println!("bytes    = {:?} ({} bytes, total_size = {})", bytes, bytes.len(), m.total_size());
    assert_eq!(M::deserialize(&bytes, 0, bytes.len())?, m);

    // A nested scene, serialized into the middle of a larger buffer.
    let mut scene = Scene {
        name: "root 🍕".to_string(),
        origin: Point::new(1.0, -2.5),
        focus: Some(Point::new(0.5, 0.5)),
        ..Default::default()
    };
    scene.data.colors = vec![Color::Red, Color::Blue];
    scene.children.push(Scene {
        name: "leaf".to_string(),
        ..Default::default()
    });

    let mut buffer = vec![0u8; 8 + scene.total_size()];
    let written = scene.serialize_into(&mut buffer, 8)?;
    println!("scene    = {} bytes at offset 8", written);

    // Populate an existing value in place.
    let mut decoded = Scene::default();
    let consumed = decoded.unpack(&buffer, 8, written)?;
    println!("consumed = {} bytes", consumed);
    println!("name     = {}", decoded.name);
    println!("origin   = ({}, {})", decoded.origin.x, decoded.origin.y);
    println!("colors   = {:?}", decoded.data.colors);
    println!("children = {}", decoded.children.len());
    assert_eq!(decoded, scene);

    Ok(())
}
