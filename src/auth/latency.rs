use std::time::Duration;

/// Artificial delay applied before login and signup resolve.
///
/// It exists to make the interactive flow feel like a network round trip.
/// Tests use [`Latency::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latency {
    None,
    #[default]
    Simulated,
    Fixed(Duration),
}

impl Latency {
    pub const SIMULATED: Duration = Duration::from_millis(500);

    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Self::None
        } else {
            Self::Fixed(Duration::from_millis(ms))
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Simulated => Self::SIMULATED,
            Self::Fixed(d) => *d,
        }
    }

    pub async fn wait(&self) {
        let duration = self.duration();
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_millis_means_no_delay() {
        assert_eq!(Latency::from_millis(0), Latency::None);
        assert_eq!(Latency::None.duration(), Duration::ZERO);
    }

    #[test]
    fn default_is_half_a_second() {
        assert_eq!(Latency::default().duration(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_sleeps_for_the_configured_duration() {
        let start = tokio::time::Instant::now();
        Latency::from_millis(250).wait().await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
