mod common;

use docgen_core::AnyEmptyResult;

#[test]
fn expand_uses_config_macros() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("docgen.toml"),
		"[macros]\nproject = \"docgen\"\nversion = \"0.3.0\"\n",
	)?;

	common::docgen_cmd()
		.arg("expand")
		.arg("$project $version")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("docgen 0.3.0\n");

	Ok(())
}

#[test]
fn expand_drops_unknown_macros_with_a_warning() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::docgen_cmd()
		.arg("expand")
		.arg("hello $nobody")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("hello \n")
		.stderr(predicates::str::contains("unknown macro"));

	Ok(())
}

#[test]
fn expand_reports_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("docgen.toml"), "[macros\n")?;

	common::docgen_cmd()
		.arg("expand")
		.arg("text")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("docgen::config_parse"));

	Ok(())
}
