mod readiness_tests;
mod submit_flow_tests;
mod support;
