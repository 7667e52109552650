//! Integration tests for ifcfg storage and parsing
