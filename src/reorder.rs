/// Move the element at `from` so it ends up at index `to`.
///
/// Elements between the two positions shift by one; nothing is swapped.
/// A missing destination (drag released outside the list) or an
/// out-of-range source returns the sequence unchanged. A destination past
/// the end is clamped to the last position.
pub fn reorder<T>(mut sequence: Vec<T>, from: usize, to: Option<usize>) -> Vec<T> {
    let Some(to) = to else {
        return sequence;
    };
    if from >= sequence.len() {
        return sequence;
    }

    let item = sequence.remove(from);
    let to = to.min(sequence.len());
    sequence.insert(to, item);
    sequence
}
