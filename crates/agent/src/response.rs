//! Response selection
//!
//! Uniform random choice among a topic's responses, or among the fallback
//! responses when no topic matched. The RNG is injectable: tests use
//! [`ResponseSelector::seeded`], production seeds from OS entropy.

use std::time::Duration;

use legalmind_config::ThinkingDelayConfig;
use legalmind_text_processing::KnowledgeBase;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks canned responses and thinking delays
#[derive(Debug)]
pub struct ResponseSelector {
    rng: Mutex<StdRng>,
}

impl ResponseSelector {
    /// Selector seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic selector
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Pick a response for `topic`, or a fallback when `topic` is `None`
    ///
    /// An unknown topic key is treated like no match. Never returns an empty
    /// string as long as the knowledge base is valid.
    pub fn select<'kb>(&self, topic: Option<&str>, kb: &'kb KnowledgeBase) -> &'kb str {
        let candidates = match topic {
            Some(key) => match kb.lookup(key) {
                Some(topic) => topic.responses(),
                None => {
                    tracing::warn!(topic = key, "Unknown topic key, using fallback responses");
                    kb.fallback_responses()
                }
            },
            None => kb.fallback_responses(),
        };

        self.pick(candidates)
    }

    fn pick<'a>(&self, candidates: &'a [String]) -> &'a str {
        match candidates.len() {
            0 => "",
            1 => &candidates[0],
            n => {
                let index = self.rng.lock().gen_range(0..n);
                &candidates[index]
            }
        }
    }

    /// Random delay within the configured window, inclusive
    pub fn thinking_delay(&self, config: &ThinkingDelayConfig) -> Duration {
        if config.min_ms >= config.max_ms {
            return config.min();
        }
        let ms = self.rng.lock().gen_range(config.min_ms..=config.max_ms);
        Duration::from_millis(ms)
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalmind_text_processing::Topic;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::new(
            "Hello",
            vec![
                Topic::new("taxation", ["gst"], ["tax one", "tax two", "tax three"]),
                Topic::new("bail", ["bail"], ["only bail answer"]),
            ],
            vec!["fallback one".to_string(), "fallback two".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_select_from_topic() {
        let kb = kb();
        let selector = ResponseSelector::seeded(7);
        let responses = kb.lookup("taxation").unwrap().responses();

        for _ in 0..50 {
            let reply = selector.select(Some("taxation"), &kb);
            assert!(responses.iter().any(|r| r == reply));
        }
    }

    #[test]
    fn test_single_response_topic() {
        let kb = kb();
        let selector = ResponseSelector::seeded(1);
        assert_eq!(selector.select(Some("bail"), &kb), "only bail answer");
    }

    #[test]
    fn test_no_topic_uses_fallback() {
        let kb = kb();
        let selector = ResponseSelector::seeded(3);
        let reply = selector.select(None, &kb);
        assert!(kb.fallback_responses().iter().any(|r| r == reply));
    }

    #[test]
    fn test_unknown_topic_uses_fallback() {
        let kb = kb();
        let selector = ResponseSelector::seeded(3);
        let reply = selector.select(Some("astrology"), &kb);
        assert!(kb.fallback_responses().iter().any(|r| r == reply));
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let kb = kb();
        let a = ResponseSelector::seeded(42);
        let b = ResponseSelector::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.select(Some("taxation"), &kb), b.select(Some("taxation"), &kb));
        }
    }

    #[test]
    fn test_all_responses_reachable() {
        let kb = kb();
        let selector = ResponseSelector::seeded(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(selector.select(Some("taxation"), &kb));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_thinking_delay_window() {
        let selector = ResponseSelector::seeded(5);
        let config = ThinkingDelayConfig::default();
        for _ in 0..50 {
            let delay = selector.thinking_delay(&config);
            assert!(delay >= Duration::from_millis(1500));
            assert!(delay <= Duration::from_millis(3000));
        }

        assert_eq!(
            selector.thinking_delay(&ThinkingDelayConfig::fixed(20)),
            Duration::from_millis(20)
        );
        assert_eq!(selector.thinking_delay(&ThinkingDelayConfig::none()), Duration::ZERO);
    }
}
