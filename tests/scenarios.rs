// In: tests/scenarios.rs

//! End-to-end scenarios: the demonstrations a user of the engine would run
//! first, driven only through the public API.

use log::LevelFilter;

use transduce::logging::enable_verbose_logging;
use transduce::stream::SegmentList;
use transduce::{
    accumulate, reduce, transduce, transduce_slice, CollectingReducer, ComposingTransducer,
    EngineConfig, FilteringTransducer, IdentityReducer, LoggingReducer, MappingTransducer,
    Segment, StreamRange, StreamStatus, SumReducer, TrackingAllocator, TransduceError,
    Transducer, TypeTag, Value,
};

const MIXED: [f32; 8] = [-1.0, 1.0, -2.0, 2.0, 3.0, -3.0, 4.0, -4.0];

fn positive(value: &Value<'_>) -> bool {
    value.as_f32().is_some_and(|x| x > 0.0)
}

fn init_logging() {
    enable_verbose_logging(LevelFilter::Debug, None).unwrap();
}

//==================================================================================
// 1. Single fold step
//==================================================================================

#[test]
fn test_accumulate_one_and_three() {
    let alloc = TrackingAllocator::new();
    let one = Value::make_float(1.0, &alloc).unwrap();
    let three = Value::make_float(3.0, &alloc).unwrap();

    let four = accumulate::<f32>(&one, &three, &alloc).unwrap();
    assert_eq!(four.as_f32(), Some(4.0));
    assert_eq!(four.to_string(), "4.000000");

    drop((one, three, four));
    assert_eq!(alloc.live_blocks(), 0);
}

//==================================================================================
// 2. Plain reduction over a stream
//==================================================================================

#[test]
fn test_stream_sum() {
    init_logging();
    let alloc = TrackingAllocator::new();
    let values = [1.0f32, 2.0, 3.0, 4.0];
    let sum = SumReducer::<f32>::new();

    let mut range = StreamRange::from_floats(&values);
    let result = reduce(&mut range, &sum, &alloc).unwrap();

    assert_eq!(result.as_f32(), Some(10.0));
    assert_eq!(range.status(), StreamStatus::ReadPastEnd);
    assert_eq!(range.elements_pulled(), 4);
}

#[test]
fn test_stream_sum_over_raw_bytes() {
    let alloc = TrackingAllocator::new();
    let bytes: Vec<u8> = [1.5f64, 2.5]
        .iter()
        .flat_map(|x| x.to_ne_bytes())
        .collect();

    let mut range = StreamRange::from_contiguous_buffer(&bytes, TypeTag::Double).unwrap();
    let result = reduce(&mut range, &SumReducer::<f64>::new(), &alloc).unwrap();
    assert_eq!(result.as_f64(), Some(4.0));
}

//==================================================================================
// 3. Fused pipelines
//==================================================================================

#[test]
fn test_filter_then_running_sum_through_observers() {
    init_logging();
    let alloc = TrackingAllocator::new();
    let sum = SumReducer::<f32>::new();
    let logger = LoggingReducer::new("running sum");
    let seen = CollectingReducer::<f32>::new();
    let filter = FilteringTransducer::new(positive);
    let mapping = MappingTransducer::new(&sum);
    let observe = MappingTransducer::new(&logger);
    let process = ComposingTransducer::empty()
        .then(&filter)
        .then(&mapping)
        .then(&observe);

    let mut range = StreamRange::from_floats(&MIXED);
    let result = transduce(&mut range, &process, Box::new(&seen), &alloc).unwrap();

    assert_eq!(result.as_f32(), Some(10.0));
    assert_eq!(seen.seen(), vec![1.0, 3.0, 6.0, 10.0]);
}

#[test]
fn test_same_pipeline_over_a_slice() {
    let alloc = TrackingAllocator::new();
    let sum = SumReducer::<f32>::new();
    let filter = FilteringTransducer::new(positive);
    let mapping = MappingTransducer::new(&sum);
    let process = ComposingTransducer::empty().then(&filter).then(&mapping);

    let first = transduce_slice(&MIXED, &process, &alloc).unwrap();
    let second = transduce_slice(&MIXED, &process, &alloc).unwrap();

    assert_eq!(first.as_f32(), Some(10.0));
    assert_eq!(first, second);
}

#[test]
fn test_pipeline_over_segmented_stream() {
    let alloc = TrackingAllocator::new();
    let values = MIXED;
    let (head, tail) = values.split_at(3);
    let sum = SumReducer::<f32>::new();
    let filter = FilteringTransducer::new(positive);
    let mapping = MappingTransducer::new(&sum);
    let process = ComposingTransducer::empty().then(&filter).then(&mapping);

    let mut range = StreamRange::from_segments([
        Segment::from_floats(head),
        Segment::from_floats(&[]),
        Segment::from_floats(tail),
    ]);
    let result = transduce(&mut range, &process, Box::new(IdentityReducer), &alloc).unwrap();

    assert_eq!(result.as_f32(), Some(10.0));
    assert_eq!(range.status(), StreamStatus::ReadPastEnd);
}

#[test]
fn test_pipeline_stops_on_type_mismatch() {
    let alloc = TrackingAllocator::new();
    let floats = [1.0f32];
    let doubles = [2.0f64];
    let sum = SumReducer::<f32>::new();
    let mapping = MappingTransducer::new(&sum);

    let mut range = StreamRange::with_source(SegmentList::new([
        Segment::from_floats(&floats),
        Segment::from_doubles(&doubles),
    ]));
    let result = transduce(&mut range, &mapping, Box::new(IdentityReducer), &alloc);

    assert!(matches!(
        result,
        Err(TransduceError::TypeMismatch {
            expected: TypeTag::Float,
            found: TypeTag::Double
        })
    ));
}

//==================================================================================
// 4. Stream safety
//==================================================================================

#[test]
fn test_pulling_past_the_end_is_inert() {
    let values = [7.0f32];
    let mut range = StreamRange::from_floats(&values);

    assert_eq!(range.pull_next().as_f32(), Some(7.0));
    for _ in 0..3 {
        assert!(range.pull_next().is_null());
        assert_eq!(range.status(), StreamStatus::ReadPastEnd);
        assert_eq!(range.remaining_in_segment(), 0);
    }
}

#[test]
fn test_configured_guard_stops_an_empty_source() {
    let alloc = TrackingAllocator::new();
    let config = EngineConfig::from_json_str(r#"{ "max_consecutive_empty_segments": 3 }"#).unwrap();
    let source = || Ok::<_, StreamStatus>(Segment::from_floats(&[]));

    let mut range = StreamRange::with_source(source).configured(&config);
    let result = reduce(&mut range, &IdentityReducer, &alloc).unwrap();

    assert!(result.is_null());
    assert_eq!(range.status(), StreamStatus::Fault);
}

//==================================================================================
// 5. Ownership accounting
//==================================================================================

#[test]
fn test_every_owned_value_is_released() {
    let alloc = TrackingAllocator::new();
    let sum = SumReducer::<f32>::new();
    let filter = FilteringTransducer::new(positive);
    let mapping = MappingTransducer::new(&sum);
    let seen = CollectingReducer::<f32>::new();
    let process = ComposingTransducer::empty().then(&filter).then(&mapping);
    {
        let reducer = process.apply(Box::new(&seen), &alloc).unwrap();
        let result = reduce(&mut StreamRange::from_floats(&MIXED), &*reducer, &alloc).unwrap();
        assert_eq!(result.as_f32(), Some(10.0));
        assert!(result.is_owned());
    }
    let stats = alloc.stats();
    assert_eq!(stats.live_blocks, 0);
    assert_eq!(stats.total_allocations, stats.total_releases);
}

#[test]
fn test_allocation_budget_from_config() {
    let config = EngineConfig::from_json_str(r#"{ "allocation_budget_bytes": 4 }"#).unwrap();
    let alloc = TrackingAllocator::from_config(&config);
    let values = [1.0f32, 2.0];

    let mut range = StreamRange::from_floats(&values).configured(&config);
    let result = reduce(&mut range, &SumReducer::<f32>::new(), &alloc);

    assert!(matches!(
        result,
        Err(TransduceError::AllocationFailed { requested: 4, .. })
    ));
    assert_eq!(alloc.stats().refused, 1);
    assert_eq!(alloc.live_blocks(), 0);
}
