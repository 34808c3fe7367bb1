// Window or driver failures must come back from the surface as errors so the runner can exit
// with -1; a panicking GLFW error callback would abort before that.
#[test]
fn glfw_errors_are_not_fatal() {
  assert!(lucent_glfw::LOGS_ERRORS);
}
