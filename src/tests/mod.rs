mod support;

mod extractor_tests;
mod validator_tests;
