use ndindex::ArrayIndex;
use ndindex::ErrorKind;
use ndindex::Expansion;
use ndindex::Index;
use ndindex::IndexOpts;
use ndindex::Position;
use ndindex::Slice;
use ndindex::Tuple;
use ndindex::compose;
use ndindex::tuple;
use tracing::Level;

/// Print engine logs at `level` and above when a test fails. `RUST_LOG`
/// takes precedence when set.
fn set_tracing_env_filter(level: Level) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_str()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .finish();
    // Another test may have installed it already.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[test]
fn test_resolve_negative_start() {
    set_tracing_env_filter(Level::DEBUG);
    let index = Index::from(-3..);
    let resolved = Slice::from(-3..).resolve(10);
    assert_eq!(resolved.start(), Position::At(7));
    assert_eq!(resolved.stop(), Position::At(10));
    assert_eq!(resolved.step(), 1);
    assert_eq!(index.newshape(&[10]).unwrap(), vec![3]);
}

#[test]
fn test_expand_leading_integer() {
    set_tracing_env_filter(Level::DEBUG);
    let index = Index::from(tuple![1, Index::Ellipsis].unwrap());
    let expanded = index.expand(&[4, 5, 6]).unwrap();
    assert_eq!(expanded, Index::from(tuple![1, .., ..].unwrap()));
    assert_eq!(index.newshape(&[4, 5, 6]).unwrap(), vec![5, 6]);
}

#[test]
fn test_multiple_ellipses() {
    let err = tuple![Index::Ellipsis, Index::Ellipsis].unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_out_of_bounds() {
    let err = Index::from(10).validate(&[5]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
    assert_eq!(err.to_string(), "index 10 is out of bounds for axis 0 with size 5");
}

#[test]
fn test_compose_slices() {
    set_tracing_env_filter(Level::DEBUG);
    let c = compose(&Index::from(2..8), &Index::from(1..3), &[10]).unwrap();
    assert_eq!(c, Index::from(3..5));
    assert_eq!(c.to_string(), "3:5");
}

#[test]
fn test_full_slice_spellings() {
    for n in [0, 1, 7] {
        let explicit = Index::from(Slice::new(Some(0), Some(n as i64), Some(1)).unwrap());
        let implicit = Index::from(Slice::new(None, None, None).unwrap());
        assert_eq!(
            explicit.canonicalize(&[n]).unwrap(),
            implicit.canonicalize(&[n]).unwrap()
        );
    }
}

#[test]
fn test_identity_composition() {
    let shape = [4, 5, 6];
    let reverse = Slice::new(None, None, Some(-2)).unwrap();
    let a = Index::from(tuple![-1, Index::NewAxis, reverse].unwrap());
    let canonical = a.canonicalize(&shape).unwrap();

    let empty = Index::from(Tuple::empty());
    assert_eq!(a.compose(&empty, &shape).unwrap(), canonical);
    assert_eq!(empty.compose(&a, &shape).unwrap(), canonical);

    // The identity spelled as one full slice per axis.
    let full = |ndim: usize| {
        Index::from(Tuple::new(vec![Index::from(Slice::full()); ndim]).unwrap())
    };
    let intermediate = a.newshape(&shape).unwrap();
    assert_eq!(intermediate, vec![1, 3, 6]);
    assert_eq!(a.compose(&full(intermediate.len()), &shape).unwrap(), canonical);
    assert_eq!(full(shape.len()).compose(&a, &shape).unwrap(), canonical);
}

#[test]
fn test_canonical_idempotent() {
    let shape = [4, 5, 6];
    let indices = [
        Index::from(tuple![Index::Ellipsis, -1].unwrap()),
        Index::from(tuple![Index::NewAxis, 0, 1..100].unwrap()),
        Index::from(Slice::new(Some(-1), None, Some(-3)).unwrap()),
        Index::from(tuple![.., .., ..].unwrap()),
    ];
    for index in indices {
        let canonical = index.canonicalize(&shape).unwrap();
        assert_eq!(canonical.canonicalize(&shape).unwrap(), canonical);
    }
}

#[test]
fn test_result_rank() {
    let index =
        Index::from(tuple![Index::NewAxis, 0, Index::Ellipsis, 2, Index::NewAxis].unwrap());
    let expansion = Expansion::new(&index, &[3, 4, 5, 6]).unwrap();
    let shape = expansion.result_shape();
    // Four axes, two removed by integers, two inserted.
    assert_eq!(shape, vec![1, 4, 5, 1]);
    assert_eq!(expansion.new_axes(), vec![0, 3]);
}

#[test]
fn test_empty_slices() {
    assert_eq!(Index::from(5..2).newshape(&[10]).unwrap(), vec![0]);
    assert_eq!(
        Index::from(5..2).canonicalize(&[10]).unwrap(),
        Index::from(Slice::empty())
    );
}

#[test]
fn test_fancy_indexing() {
    let index = Index::from(
        tuple![
            0,
            ..,
            ArrayIndex::integer([2, 1]),
            ArrayIndex::boolean([5], 3).unwrap()
        ]
        .unwrap(),
    );
    assert_eq!(index.newshape(&[3, 4, 6, 5]).unwrap(), vec![2, 3, 4]);

    let strict = IndexOpts::strict();
    let err = Expansion::with_opts(&index, &[3, 4, 6, 5], &strict).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);

    let bad = Index::from(tuple![ArrayIndex::integer([2]), ArrayIndex::integer([3])].unwrap());
    assert_eq!(bad.newshape(&[4, 4]).unwrap_err().kind(), ErrorKind::Broadcast);
}

#[test]
fn test_json_form() {
    let index = Index::from(tuple![1, Index::Ellipsis, 2..8].unwrap());
    let json = serde_json::to_string(&index).unwrap();
    let back: Index = serde_json::from_str(&json).unwrap();
    assert_eq!(back, index);
}

#[test]
fn test_single_element_slice_equivalence() {
    let shape = [3, 2];
    let lifted = Index::from(tuple![-3, Index::NewAxis].unwrap());
    let sliced = Index::from(tuple![-3..-2, -3..2].unwrap());
    assert_eq!(lifted.newshape(&shape).unwrap(), vec![1, 2]);
    assert_eq!(
        lifted.canonicalize(&shape).unwrap(),
        sliced.canonicalize(&shape).unwrap()
    );
    assert_eq!(lifted.canonicalize(&shape).unwrap(), Index::from(..1));
}

#[test]
fn test_axis_too_long() {
    let err = Index::from(-1).canonicalize(&[usize::MAX]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert_eq!(
        Index::from(-1).canonicalize(&[ndindex::MAX_AXIS_LEN]).unwrap(),
        Index::from(i64::MAX - 1)
    );
}
