use sparsebench::tensor::{FeatureMap, Tensor};

#[test]
fn tensor_get_set() {
    let mut t = Tensor::new(1, 2, 3, 4);
    t.set(0, 1, 2, 3, 42.0);
    assert_eq!(t.get(0, 1, 2, 3), 42.0);
    assert_eq!(t.data()[23], 42.0);
}

#[test]
fn tensor_fill() {
    let mut t = Tensor::new(1, 1, 2, 2);
    t.fill(7.0);
    assert_eq!(t.get(0, 0, 0, 0), 7.0);
    assert_eq!(t.get(0, 0, 1, 1), 7.0);
}

#[test]
fn tensor_add_accumulates() {
    let mut t = Tensor::new(1, 1, 1, 2);
    t.add(0, 0, 0, 1, 1.5);
    t.add(0, 0, 0, 1, 2.0);
    assert_eq!(t.get(0, 0, 0, 1), 3.5);
    assert_eq!(t.get(0, 0, 0, 0), 0.0);
}

#[test]
fn tensor_row_major_strides() {
    let t = Tensor::new(2, 3, 4, 5);
    assert_eq!(t.index(1, 2, 3, 4), 2 * 3 * 4 * 5 - 1);
    assert_eq!(t.index(0, 1, 0, 0), 20);
    assert_eq!(t.index(0, 0, 1, 0), 5);
}

#[test]
fn tensor_padded_copies_interior() {
    let t = Tensor::from_vec(1, 1, 2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let p = t.padded(1);
    assert_eq!(p.shape(), [1, 1, 4, 4]);
    assert_eq!(p.get(0, 0, 1, 1), 1.0);
    assert_eq!(p.get(0, 0, 2, 2), 4.0);
    assert_eq!(p.get(0, 0, 0, 0), 0.0);
    assert_eq!(p.count_nonzero(), 4);
}

#[test]
fn tensor_from_vec_rejects_wrong_length() {
    assert!(Tensor::from_vec(1, 1, 2, 2, vec![0.0; 3]).is_none());
}

#[test]
fn tensor_empty() {
    let t = Tensor::empty();
    assert!(t.is_empty());
    assert_eq!(t.to_string(), "0x0x0x0");
}

#[test]
fn feature_map_is_single_channel_tensor() {
    let mut map = FeatureMap::zeros(3, 4);
    map.set(2, 1, 5.0);
    assert_eq!(map.as_tensor().shape(), [1, 1, 3, 4]);
    assert_eq!(map.as_tensor().get(0, 0, 2, 1), 5.0);
    assert_eq!(map.get(3, 0), None);
    assert!((map.density() - 1.0 / 12.0).abs() < 1e-12);
}
