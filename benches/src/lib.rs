/// Check-ins of `$count` visitors at `$venue`, each lasting `$duration` seconds starting at `$start`.
/// Returns all their encrypted records.
#[macro_export]
macro_rules! encode_visits {
    ($rng: ident, $venue: expr, $count: expr, $start: expr, $duration: expr) => {
        (0..$count)
            .flat_map(|_| {
                let id = crowd_notifier::visit::VisitId::new(&mut $rng);
                crowd_notifier::visit::encode(&mut $rng, &$venue, id, $start, $start + $duration)
                    .unwrap()
            })
            .collect::<Vec<_>>()
    };
}
