//! End-to-end use of a texture the way a host drives it.

use memtexture::{
    BufferLimits, Field, HostValue, Method, PixelFormat, TextureHost, TextureOptions, new_texture,
    new_texture_with_limits,
};

fn bind(texture: &dyn TextureHost, name: &str) -> Method {
    match texture.field(name) {
        Some(Field::Method(method)) => method,
        other => panic!("{name} is not a method: {other:?}"),
    }
}

fn create(options: TextureOptions) -> Box<dyn TextureHost> {
    Box::new(new_texture(&options).expect("valid options"))
}

#[test]
fn script_session() {
    let mut texture = create(
        TextureOptions::from_fields([
            ("width", HostValue::Integer(2)),
            ("height", HostValue::Integer(2)),
            ("format", HostValue::from("rgba")),
        ]),
    );
    assert_eq!(texture.field("format"), Some(Field::Value("rgba".into())));

    let set = bind(texture.as_ref(), "setPixel");
    let get = bind(texture.as_ref(), "getPixel");
    let resize = bind(texture.as_ref(), "resize");

    let mut args: Vec<HostValue> = vec![1.into(), 1.into()];
    args.extend([1.0, 0.0, 0.0, 1.0].map(HostValue::from));
    assert!(texture.call(set, &args).is_empty());
    assert_eq!(&texture.bitmap()[..4], &[255, 0, 0, 255]);

    let red = texture.call(get, &[1.into(), 1.into()]);
    let red: Vec<f64> = red.iter().filter_map(HostValue::as_number).collect();
    assert_eq!(red, [1.0, 0.0, 0.0, 1.0]);

    assert_eq!(
        texture.call(get, &[2.into(), 2.into()]),
        vec![HostValue::Number(0.0); 4]
    );
    assert!(texture.call(get, &[3.into(), 1.into()]).is_empty());

    texture.call(resize, &[4.into(), 3.into()]);
    assert_eq!((texture.width(), texture.height()), (4, 3));
    assert_eq!(texture.bitmap().len(), 4 * 3 * 4);
    assert!(texture.bitmap().iter().all(|&b| b == 0));
    assert_eq!(texture.format(), PixelFormat::Rgba);

    texture.finalize();
}

#[test]
fn mask_texture() {
    let mut texture = create(
        TextureOptions::new()
            .with_width(3)
            .with_height(1)
            .with_format("mask"),
    );
    assert_eq!(texture.format(), PixelFormat::Mask);
    assert_eq!(texture.field("format"), Some(Field::Value("mask".into())));

    let list = HostValue::List(vec![0.5.into(), 1.0.into()]);
    texture.call(Method::SetPixel, &[2.into(), 1.into(), list]);
    assert_eq!(texture.bitmap(), &[0, 127, 0]);

    let out = texture.call(Method::GetPixel, &[2.into(), 1.into()]);
    assert_eq!(out, [HostValue::Number(127.0 / 255.0)]);
    texture.finalize();
}

#[test]
fn rgb_texture_partial_writes() {
    let mut texture = create(
        TextureOptions::new()
            .with_width(1)
            .with_height(1)
            .with_format("rgb"),
    );
    texture.call(
        Method::SetPixel,
        &[1.into(), 1.into(), 0.2.into(), 0.4.into(), 0.6.into()],
    );
    texture.call(Method::SetPixel, &[1.into(), 1.into(), 1.0.into()]);
    assert_eq!(texture.bitmap(), &[255, 102, 153]);

    texture.call(Method::SetPixel, &[1.into(), 1.into(), HostValue::Nil]);
    assert_eq!(texture.bitmap(), &[255, 102, 153]);
    texture.finalize();
}

#[test]
fn unknown_fields_are_absent() {
    let texture = create(TextureOptions::new().with_width(1).with_height(1));
    for name in ["width", "data", "GetPixel", "set_pixel", "dispose"] {
        assert!(texture.field(name).is_none(), "{name}");
    }
    texture.finalize();
}

#[test]
fn construction_failures_are_absent() {
    assert!(new_texture(&TextureOptions::new()).is_none());
    assert!(new_texture(&TextureOptions::new().with_width(2)).is_none());
    assert!(new_texture(&TextureOptions::new().with_width(2).with_height(0)).is_none());

    let options = TextureOptions::new().with_width(100).with_height(100);
    let limits = BufferLimits::none().with_max_pixels(1000);
    assert!(new_texture_with_limits(&options, limits).is_none());
}

#[test]
fn resize_failures_keep_contents() {
    let options = TextureOptions::new()
        .with_width(2)
        .with_height(2)
        .with_format("mask");
    let limits = BufferLimits::none().with_max_height(8);
    let mut texture: Box<dyn TextureHost> =
        Box::new(new_texture_with_limits(&options, limits).expect("within limits"));
    texture.call(Method::SetPixel, &[1.into(), 2.into(), 1.0.into()]);

    texture.call(Method::Resize, &[2.into(), 9.into()]);
    texture.call(Method::Resize, &[0.into(), 2.into()]);
    texture.call(Method::Resize, &[HostValue::Nil, 2.into()]);

    assert_eq!((texture.width(), texture.height()), (2, 2));
    assert_eq!(texture.bitmap(), &[0, 0, 255, 0]);
    texture.finalize();
}
