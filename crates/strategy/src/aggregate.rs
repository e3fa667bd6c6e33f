use common::{Error, Result, Signal};

/// The signal with the strictly greatest confidence. Ties keep the earliest
/// entry, so insertion order decides between equally confident strategies.
pub fn select_best(signals: &[Signal]) -> Result<&Signal> {
    best_index(signals).map(|i| &signals[i])
}

/// Owned variant of [`select_best`].
pub fn into_best(mut signals: Vec<Signal>) -> Result<Signal> {
    let index = best_index(&signals)?;
    Ok(signals.swap_remove(index))
}

fn best_index(signals: &[Signal]) -> Result<usize> {
    if signals.is_empty() {
        return Err(Error::NoStrategies);
    }
    Ok((1..signals.len()).fold(0, |best, i| {
        if signals[i].confidence > signals[best].confidence {
            i
        } else {
            best
        }
    }))
}
