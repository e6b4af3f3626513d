//! Every value that goes in comes back out unchanged.

use proptest::prelude::*;
use variant_marshal::{
    decode, encode, headless,
    math::{
        Aabb, Basis, Color, Plane, Projection, Quaternion, Real, Rect2, Rect2I, Rid, Transform2D,
        Transform3D, Vector2, Vector2I, Vector3, Vector3I, Vector4, Vector4I,
    },
    Variant,
};

fn real() -> impl Strategy<Value = Real> {
    (-1.0e6f32..1.0e6f32).prop_map(|x| x as Real)
}

prop_compose! {
    fn vector2()(x in real(), y in real()) -> Vector2 {
        Vector2::new(x, y)
    }
}

prop_compose! {
    fn vector3()(x in real(), y in real(), z in real()) -> Vector3 {
        Vector3::new(x, y, z)
    }
}

prop_compose! {
    fn vector4()(x in real(), y in real(), z in real(), w in real()) -> Vector4 {
        Vector4::new(x, y, z, w)
    }
}

prop_compose! {
    fn basis()(x in vector3(), y in vector3(), z in vector3()) -> Basis {
        Basis { rows: [x, y, z] }
    }
}

prop_compose! {
    fn vector2i()(x in any::<i32>(), y in any::<i32>()) -> Vector2I {
        Vector2I::new(x, y)
    }
}

proptest! {
    #[test]
    fn scalars(b in any::<bool>(), i in any::<i64>(), f in -1.0e12f64..1.0e12) {
        headless::install().unwrap();

        prop_assert_eq!(decode::convert_to_bool(&encode::create_from_bool(b)), b);
        prop_assert_eq!(decode::convert_to_int64(&encode::create_from_int(i)), i);
        prop_assert_eq!(decode::convert_to_uint64(&encode::create_from_uint(i as u64)), i as u64);
        prop_assert_eq!(decode::convert_to_float64(&encode::create_from_float(f)), f);
    }

    #[test]
    fn narrow_integers(i in any::<i32>(), u in any::<u16>()) {
        headless::install().unwrap();

        prop_assert_eq!(decode::convert_to_int32(&Variant::from(i)), i);
        prop_assert_eq!(decode::convert_to_uint16(&Variant::from(u)), u);
        prop_assert_eq!(decode::convert_to_char(&Variant::from(u)), u);
    }

    #[test]
    fn vectors(
        v2 in vector2(),
        v2i in vector2i(),
        v3 in vector3(),
        (x, y, z, w) in (any::<i32>(), any::<i32>(), any::<i32>(), any::<i32>()),
    ) {
        headless::install().unwrap();

        prop_assert_eq!(decode::convert_to_vector2(&encode::create_from_vector2(v2)), v2);
        prop_assert_eq!(decode::convert_to_vector2i(&encode::create_from_vector2i(v2i)), v2i);
        prop_assert_eq!(decode::convert_to_vector3(&encode::create_from_vector3(v3)), v3);
        let v3i = Vector3I::new(x, y, z);
        prop_assert_eq!(decode::convert_to_vector3i(&encode::create_from_vector3i(v3i)), v3i);
        let v4 = Vector4::new(v3.x, v3.y, v3.z, v2.x);
        prop_assert_eq!(decode::convert_to_vector4(&encode::create_from_vector4(v4)), v4);
        let v4i = Vector4I::new(x, y, z, w);
        prop_assert_eq!(decode::convert_to_vector4i(&encode::create_from_vector4i(v4i)), v4i);
    }

    #[test]
    fn shapes(position in vector2(), size in vector2(), a in vector2i(), b in vector2i(), d in real()) {
        headless::install().unwrap();

        let rect = Rect2::new(position, size);
        prop_assert_eq!(decode::convert_to_rect2(&encode::create_from_rect2(rect)), rect);
        let rect = Rect2I::new(a, b);
        prop_assert_eq!(decode::convert_to_rect2i(&encode::create_from_rect2i(rect)), rect);
        let plane = Plane::new(Vector3::new(position.x, position.y, size.x), d);
        prop_assert_eq!(decode::convert_to_plane(&encode::create_from_plane(plane)), plane);
    }

    #[test]
    fn rotations_and_colors(q in (real(), real(), real(), real()), c in (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0)) {
        headless::install().unwrap();

        let quaternion = Quaternion::new(q.0, q.1, q.2, q.3);
        prop_assert_eq!(
            decode::convert_to_quaternion(&encode::create_from_quaternion(quaternion)),
            quaternion
        );
        let color = Color::new(c.0, c.1, c.2, 1.0);
        prop_assert_eq!(decode::convert_to_color(&encode::create_from_color(color)), color);
    }

    #[test]
    fn boxed_values(x in vector2(), y in vector2(), origin in vector2(), position in vector3(), size in vector3()) {
        headless::install().unwrap();

        let transform = Transform2D { x, y, origin };
        prop_assert_eq!(
            decode::convert_to_transform2d(&encode::create_from_transform2d(transform)),
            transform
        );
        let aabb = Aabb::new(position, size);
        prop_assert_eq!(decode::convert_to_aabb(&encode::create_from_aabb(aabb)), aabb);
    }

    #[test]
    fn boxed_matrices(
        basis in basis(),
        origin in vector3(),
        columns in (vector4(), vector4(), vector4(), vector4()),
    ) {
        headless::install().unwrap();

        prop_assert_eq!(decode::convert_to_basis(&encode::create_from_basis(basis)), basis);
        let transform = Transform3D { basis, origin };
        prop_assert_eq!(
            decode::convert_to_transform3d(&encode::create_from_transform3d(transform)),
            transform
        );
        let projection = Projection {
            columns: [columns.0, columns.1, columns.2, columns.3],
        };
        prop_assert_eq!(
            decode::convert_to_projection(&encode::create_from_projection(projection)),
            projection
        );
    }

    #[test]
    fn packed_vectors(
        v2 in prop::collection::vec(vector2(), 0..8),
        v4 in prop::collection::vec(vector4(), 0..8),
    ) {
        headless::install().unwrap();

        let variant = encode::create_from_packed_vector2_array(&v2);
        prop_assert_eq!(decode::convert_as_packed_vector2_array_to_system_array(&variant), v2);
        let variant = encode::create_from_packed_vector4_array(&v4);
        prop_assert_eq!(decode::convert_as_packed_vector4_array_to_system_array(&variant), v4);
    }

    #[test]
    fn rids(id in any::<u64>()) {
        headless::install().unwrap();

        prop_assert_eq!(decode::convert_to_rid(&encode::create_from_rid(Rid(id))), Rid(id));
    }

    #[test]
    fn strings(text in any::<String>()) {
        headless::install().unwrap();

        let live = headless::live_handles();
        prop_assert_eq!(decode::convert_to_string(&encode::create_from_string(Some(&text))), text.as_str());
        prop_assert_eq!(
            decode::convert_to_string_name(&Variant::from(text.as_str())).to_string(),
            text.as_str()
        );
        prop_assert_eq!(headless::live_handles(), live);
    }

    #[test]
    fn packed_arrays(ints in prop::collection::vec(any::<i64>(), 0..16), bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        headless::install().unwrap();

        let variant = encode::create_from_packed_int64_array(&ints);
        prop_assert_eq!(decode::convert_as_packed_int64_array_to_system_array(&variant), ints);
        let variant = encode::create_from_packed_byte_array(&bytes);
        prop_assert_eq!(decode::convert_as_packed_byte_array_to_system_array(&variant), bytes);
    }
}
