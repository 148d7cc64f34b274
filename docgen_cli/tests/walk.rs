mod common;

use docgen_core::AnyEmptyResult;
use rstest::rstest;
use similar_asserts::assert_eq;

#[rstest]
#[case::by_name("rpc")]
#[case::first_group("all")]
fn walk_prints_emission_order(#[case] group: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let model = common::write_model(tmp.path(), &common::rpc_records())?;

	common::docgen_cmd()
		.arg("walk")
		.arg(group)
		.arg("--model")
		.arg(&model)
		.assert()
		.success()
		.stdout("client -> server : request\nserver -> store : lookup\n");

	Ok(())
}

#[test]
fn walk_json_includes_node_ids() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let model = common::write_model(tmp.path(), &common::rpc_records())?;

	let output = common::docgen_cmd()
		.arg("walk")
		.arg("rpc")
		.arg("--model")
		.arg(&model)
		.arg("--format")
		.arg("json")
		.output()?;
	assert!(output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(
		json,
		serde_json::json!([
			{ "from": "client", "to": "server", "message": "request", "sender": 1, "receiver": 3 },
			{ "from": "server", "to": "store", "message": "lookup", "sender": 4, "receiver": 6 },
		])
	);

	Ok(())
}

#[test]
fn walk_group_without_diagram_prints_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let model = common::write_model(tmp.path(), &common::rpc_records())?;

	common::docgen_cmd()
		.arg("walk")
		.arg("door")
		.arg("--model")
		.arg(&model)
		.assert()
		.success()
		.stdout("")
		.stderr(predicates::str::contains("no messages reach a receiver"));

	Ok(())
}

#[test]
fn walk_unknown_group_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let model = common::write_model(tmp.path(), &common::rpc_records())?;

	common::docgen_cmd()
		.arg("walk")
		.arg("missing")
		.arg("--model")
		.arg(&model)
		.assert()
		.code(2)
		.stderr(predicates::str::contains("docgen::group_not_found"));

	Ok(())
}
