// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine configuration

/// Configuration for the ROXX evaluation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting of `isInTargetGroup` / `flagValue` re-entry within one evaluation
    pub max_recursion_depth: usize,
    /// Number of compiled patterns kept by the `match` operator (0 disables the cache)
    pub regex_cache_capacity: usize,
    /// Log swallowed evaluation faults at debug level
    pub log_evaluation_failures: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: 64,
            regex_cache_capacity: 256,
            log_evaluation_failures: true,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum recursion depth
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Set the regex cache capacity
    pub fn with_regex_cache_capacity(mut self, capacity: usize) -> Self {
        self.regex_cache_capacity = capacity;
        self
    }

    /// Enable or disable logging of swallowed evaluation faults
    pub fn with_failure_logging(mut self, enabled: bool) -> Self {
        self.log_evaluation_failures = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = EngineConfig::new()
            .with_max_recursion_depth(8)
            .with_regex_cache_capacity(0)
            .with_failure_logging(false);

        assert_eq!(config.max_recursion_depth, 8);
        assert_eq!(config.regex_cache_capacity, 0);
        assert!(!config.log_evaluation_failures);
        assert_eq!(EngineConfig::default().max_recursion_depth, 64);
    }
}
