mod common;

use docgen_core::AnyEmptyResult;
use similar_asserts::assert_eq;

#[test]
fn info_prints_header_links_and_groups() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let model = common::write_model(tmp.path(), &common::rpc_records())?;

	common::docgen_cmd()
		.arg("info")
		.arg("--model")
		.arg(&model)
		.assert()
		.success()
		.stdout(predicates::str::contains("Format version"))
		.stdout(predicates::str::contains("1970-01-01 00:00:00"))
		.stdout(predicates::str::contains("Transitions absent"))
		.stdout(predicates::str::contains("3 timelines, 6 nodes, 2 messages"));

	Ok(())
}

#[test]
fn info_json_reports_counts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let model = common::write_model(tmp.path(), &common::rpc_records())?;

	let output = common::docgen_cmd()
		.arg("info")
		.arg("--model")
		.arg(&model)
		.arg("--format")
		.arg("json")
		.output()?;
	assert!(output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["version"], "1.0");
	assert_eq!(json["blocks"], 1);
	assert_eq!(json["links"]["messages_resolved"], 2);
	assert_eq!(json["links"]["transitions_absent"], 1);
	assert_eq!(json["links"]["function_pairs"], 1);
	assert_eq!(json["groups"][0]["name"], "default");
	assert_eq!(json["groups"][1]["name"], "rpc");
	assert_eq!(json["groups"][2]["states"], 1);

	Ok(())
}

#[test]
fn info_uses_model_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("build"))?;
	common::write_model(&tmp.path().join("build"), &common::rpc_records())?;
	std::fs::write(tmp.path().join("docgen.toml"), "model = \"build/docs.gdsl\"\n")?;

	common::docgen_cmd()
		.arg("info")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("docs.gdsl"));

	Ok(())
}

#[test]
fn info_without_model_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::docgen_cmd()
		.arg("info")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("docgen::model_not_configured"));

	Ok(())
}

#[test]
fn info_rejects_files_that_are_not_models() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("main.o");
	std::fs::write(&path, b"\x7fELF this is not a linked model")?;

	common::docgen_cmd()
		.arg("info")
		.arg("--model")
		.arg(&path)
		.assert()
		.code(2)
		.stderr(predicates::str::contains("docgen::bad_signature"));

	Ok(())
}

#[test]
fn groups_lists_every_group() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let model = common::write_model(tmp.path(), &common::rpc_records())?;

	common::docgen_cmd()
		.arg("groups")
		.arg("--model")
		.arg(&model)
		.assert()
		.success()
		.stdout("default\nrpc\ndoor\n");

	Ok(())
}
