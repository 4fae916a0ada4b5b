use crate::Record;

/// Sort records ascending by `(time, id)`.
///
/// The sort is stable, so records with equal keys keep their relative order.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| a.key().cmp(&b.key()));
}

/// Merge several record series belonging to the same pool.
///
/// - Series are concatenated in the given order and sorted by `(time, id)`.
/// - Adjacent records with equal `time` and `id` collapse to the earlier one,
///   so the first series wins when two copies of a draw differ in content.
/// - Distinct records sharing a timestamp are all kept, ordered by `id`.
/// - Empty series are the identity.
#[must_use]
pub fn merge_records<I>(series: I) -> Vec<Record>
where
    I: IntoIterator<Item = Vec<Record>>,
{
    let mut out: Vec<Record> = series.into_iter().flatten().collect();
    sort_records(&mut out);
    // `dedup_by` hands the later element first and removes it on `true`.
    out.dedup_by(|later, earlier| later.same_draw(earlier));
    out
}

/// True if `records` is strictly increasing by `(time, id)`: sorted and free of duplicate draws.
#[must_use]
pub fn is_canonical(records: &[Record]) -> bool {
    records.windows(2).all(|w| w[0].key() < w[1].key())
}
