//! Build-command classification.
//!
//! Turns the whitespace-split command line of one build step into a short
//! human-readable description ("compiling main.cpp", "linking app", ...).
//! Rules are evaluated in order and the first matching rule wins. The
//! classifier is pure: failures come back as typed errors and the caller
//! decides they are fatal.

use thiserror::Error;

/// Phase markers an `echo`-prefixed step is allowed to announce.
const ECHO_PHASES: [&str; 4] = ["compiling", "linking", "generating", "moc"];

/// Classification failures. All of these are fatal to the invocation: the
/// wrapped command has already run, but an unclassifiable step means the
/// trace would be incomplete, so the step is failed loudly instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("unrecognized echo phase: {0}")]
    UnrecognizedEchoPhase(String),

    #[error("linking command has no -o flag: {0}")]
    MalformedLinkCommand(String),

    #[error("unhandled command: {0}")]
    UnrecognizedCommand(String),
}

/// Classify one build step's token sequence into its description.
///
/// Commands with fewer than two tokens panic on the `tokens[1]` probes
/// below; build tools never hand us bare single-word commands, and a crash
/// there is preferred over silently mislabeling a step.
pub fn classify(tokens: &[String]) -> Result<String, ClassifyError> {
    let joined = || tokens.join(" ");

    // An `echo`-prefixed step only validates its phase word here; the
    // description still comes from the phase rules further down.
    if tokens[0] == "echo" && !ECHO_PHASES.contains(&tokens[1].as_str()) {
        return Err(ClassifyError::UnrecognizedEchoPhase(joined()));
    }

    if tokens[0] == "test" && tokens[1] == "-d" {
        return Ok(format!("mkdir {}", tokens[tokens.len() - 1]));
    }
    if tokens[0] == "cd" {
        return Ok(format!("cd {}", tokens[1]));
    }
    if tokens[0] == "rm" {
        return Ok(format!("rm {}", rm_target(tokens)));
    }
    if tokens[0] == "ar" {
        return Ok(format!("ar {}", ar_member(tokens)));
    }
    if tokens[1] == "compiling" {
        return Ok(format!("compiling {}", compile_inputs(tokens)));
    }
    if tokens[1] == "linking" {
        let output =
            link_output(tokens).ok_or_else(|| ClassifyError::MalformedLinkCommand(joined()))?;
        return Ok(format!("linking {output}"));
    }
    if tokens[1] == "generating" {
        return Ok(format!("generating {}", tokens[2]));
    }
    if tokens[1] == "moc" {
        return Ok(format!("moc {}", tokens[2]));
    }
    if tokens[0].starts_with('/') {
        // Some absolute-path command we have no rule for; label it verbatim.
        return Ok(tokens[0].clone());
    }
    if tokens[0] == "g++" || tokens[0] == "gcc" {
        // Assume the last argument names the file of interest.
        return Ok(tokens[tokens.len() - 1].clone());
    }

    Err(ClassifyError::UnrecognizedCommand(joined()))
}

/// First non-flag argument of an `rm` invocation, falling back to the last
/// token when every argument is a flag.
fn rm_target(tokens: &[String]) -> &str {
    let mut i = 1;
    while i < tokens.len() && tokens[i].starts_with('-') {
        i += 1;
    }
    if i == tokens.len() {
        i = tokens.len() - 1;
    }
    &tokens[i]
}

/// Final path segment of the first absolute-path argument of an `ar`
/// invocation, falling back to the last token when none is absolute.
fn ar_member(tokens: &[String]) -> &str {
    let mut i = 1;
    while i < tokens.len() && !tokens[i].starts_with('/') {
        i += 1;
    }
    if i == tokens.len() {
        i = tokens.len() - 1;
    }
    let path = &tokens[i];
    path.rsplit('/').next().unwrap_or(path.as_str())
}

/// Input list of a `compiling` step: everything between the phase word and
/// the `&&` that chains the real compiler command. Without an `&&` the last
/// token is dropped from the join.
fn compile_inputs(tokens: &[String]) -> String {
    let mut i = 1;
    while i < tokens.len() && tokens[i] != "&&" {
        i += 1;
    }
    if i == tokens.len() {
        i -= 1;
    }
    tokens[2..i.max(2)].join(" ")
}

/// Token following `-o` in a `linking` step, or None when `-o` is absent.
fn link_output(tokens: &[String]) -> Option<&str> {
    let mut i = 1;
    while i < tokens.len() && tokens[i] != "-o" {
        i += 1;
    }
    if i == tokens.len() {
        return None;
    }
    Some(&tokens[i + 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mkdir_rule() {
        let desc = classify(&toks(&["test", "-d", "build/obj"])).unwrap();
        assert_eq!(desc, "mkdir build/obj");
    }

    #[test]
    fn test_mkdir_rule_takes_last_token() {
        let desc = classify(&toks(&["test", "-d", "a", "||", "mkdir", "-p", "a"])).unwrap();
        assert_eq!(desc, "mkdir a");
    }

    #[test]
    fn test_cd_rule() {
        let desc = classify(&toks(&["cd", "build"])).unwrap();
        assert_eq!(desc, "cd build");
    }

    #[test]
    fn test_rm_skips_flags() {
        let desc = classify(&toks(&["rm", "-f", "-r", "output.o"])).unwrap();
        assert_eq!(desc, "rm output.o");
    }

    #[test]
    fn test_rm_all_flags_falls_back_to_last_token() {
        let desc = classify(&toks(&["rm", "-f"])).unwrap();
        assert_eq!(desc, "rm -f");
    }

    #[test]
    fn test_rm_plain_target() {
        let desc = classify(&toks(&["rm", "main.o"])).unwrap();
        assert_eq!(desc, "rm main.o");
    }

    #[test]
    fn test_ar_takes_basename_of_absolute_path() {
        let desc = classify(&toks(&["ar", "rcs", "/home/x/lib/libfoo.a"])).unwrap();
        assert_eq!(desc, "ar libfoo.a");
    }

    #[test]
    fn test_ar_no_absolute_path_falls_back_to_last_token() {
        let desc = classify(&toks(&["ar", "rcs", "libfoo.a"])).unwrap();
        assert_eq!(desc, "ar libfoo.a");
    }

    #[test]
    fn test_compiling_stops_at_and_and() {
        let desc = classify(&toks(&["cc1", "compiling", "main.cpp", "&&", "true"])).unwrap();
        assert_eq!(desc, "compiling main.cpp");
    }

    #[test]
    fn test_compiling_joins_multiple_inputs() {
        let desc = classify(&toks(&["echo", "compiling", "a.cpp", "b.cpp", "&&", "g++"])).unwrap();
        assert_eq!(desc, "compiling a.cpp b.cpp");
    }

    #[test]
    fn test_compiling_without_chain_drops_last_token() {
        let desc = classify(&toks(&["echo", "compiling", "a.cpp", "b.cpp"])).unwrap();
        assert_eq!(desc, "compiling a.cpp");
    }

    #[test]
    fn test_linking_takes_output_after_dash_o() {
        let desc = classify(&toks(&["ld", "linking", "-o", "app"])).unwrap();
        assert_eq!(desc, "linking app");
    }

    #[test]
    fn test_linking_without_dash_o_is_error() {
        let err = classify(&toks(&["ld", "linking", "app"])).unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedLinkCommand(_)));
    }

    #[test]
    fn test_generating_rule() {
        let desc = classify(&toks(&["echo", "generating", "ui_main.h", "&&", "uic"])).unwrap();
        assert_eq!(desc, "generating ui_main.h");
    }

    #[test]
    fn test_moc_rule() {
        let desc = classify(&toks(&["echo", "moc", "widget.cpp", "&&", "moc"])).unwrap();
        assert_eq!(desc, "moc widget.cpp");
    }

    #[test]
    fn test_absolute_path_command_verbatim() {
        let desc = classify(&toks(&["/usr/bin/strip", "app"])).unwrap();
        assert_eq!(desc, "/usr/bin/strip");
    }

    #[test]
    fn test_gcc_takes_last_token() {
        let desc = classify(&toks(&["gcc", "-c", "-O2", "main.c"])).unwrap();
        assert_eq!(desc, "main.c");
    }

    #[test]
    fn test_gplusplus_takes_last_token() {
        let desc = classify(&toks(&["g++", "-c", "widget.cpp"])).unwrap();
        assert_eq!(desc, "widget.cpp");
    }

    #[test]
    fn test_unrecognized_echo_phase_is_error() {
        let err = classify(&toks(&["echo", "frobnicating", "x"])).unwrap_err();
        assert!(matches!(err, ClassifyError::UnrecognizedEchoPhase(_)));
    }

    #[test]
    fn test_recognized_echo_phase_falls_through_to_phase_rule() {
        // The echo rule itself never sets a description.
        let desc = classify(&toks(&["echo", "linking", "-o", "app"])).unwrap();
        assert_eq!(desc, "linking app");
    }

    #[test]
    fn test_unhandled_command_is_error() {
        let err = classify(&toks(&["make", "all"])).unwrap_err();
        assert_eq!(
            err,
            ClassifyError::UnrecognizedCommand("make all".to_string())
        );
    }

    #[test]
    fn test_phase_rules_win_over_absolute_path_rule() {
        // Ordering: tokens[1] phase rules come before the leading-slash rule.
        let desc = classify(&toks(&["/bin/echo", "compiling", "x.c", "&&", "cc"])).unwrap();
        assert_eq!(desc, "compiling x.c");
    }

    #[test]
    fn test_classification_is_idempotent() {
        let tokens = toks(&["rm", "-f", "-r", "output.o"]);
        assert_eq!(classify(&tokens), classify(&tokens));
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let echo = classify(&toks(&["echo", "bogus", "x"])).unwrap_err();
        let link = classify(&toks(&["ld", "linking", "app"])).unwrap_err();
        let unhandled = classify(&toks(&["make", "all"])).unwrap_err();
        assert_ne!(echo.to_string(), link.to_string());
        assert_ne!(link.to_string(), unhandled.to_string());
        assert_ne!(echo.to_string(), unhandled.to_string());
    }
}
