use crate::config::RendererConfig;
use anyhow::Context as _;
use serde::Serialize;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;
use wordmath::{Analogy, Op, Word, WordVectors};

/// What the external renderer receives: the operand vectors, the operator
/// sequence, the computed result vector and the scored neighbors.
#[derive(Serialize)]
struct ScenePayload {
    inputs: Vec<(String, Vec<f32>)>,
    ops: Vec<Op>,
    result: (String, Vec<f32>),
    similars: Vec<(String, Vec<f32>, f32)>,
}

/// Fire-and-forget renderer invocation. Failures are logged and never touch
/// the selector.
pub fn launch(
    config: &RendererConfig,
    analogy: &Analogy,
    vectors: &Arc<WordVectors>,
    similars: &[(Word, f32)],
) {
    let Some(command) = config.command.clone() else {
        log::debug!("no renderer configured, skipping the explanation scene");
        return;
    };
    let analogy = analogy.clone();
    let vectors = Arc::clone(vectors);
    let similars = similars.to_vec();
    thread::spawn(move || {
        if let Err(e) = run(&command, &analogy, &vectors, &similars) {
            log::error!("renderer failed: {e:#}");
        }
    });
}

fn run(
    command: &str,
    analogy: &Analogy,
    vectors: &WordVectors,
    similars: &[(Word, f32)],
) -> anyhow::Result<()> {
    let payload = build_payload(analogy, vectors, similars);
    let path = std::env::temp_dir().join("wordwheel-scene.json");
    fs_err::write(&path, serde_json::to_vec(&payload)?)?;

    let argv = shell_words::split(command)?;
    let (program, args) = argv.split_first().context("renderer command is empty")?;
    let status = Command::new(program)
        .args(args)
        .arg(&path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    anyhow::ensure!(status.success(), "renderer exited with {status}");
    log::info!("explanation scene rendered");
    Ok(())
}

fn build_payload(
    analogy: &Analogy,
    vectors: &WordVectors,
    similars: &[(Word, f32)],
) -> ScenePayload {
    ScenePayload {
        inputs: analogy
            .operands()
            .filter_map(|word| {
                vectors
                    .vector_of(word)
                    .map(|v| (word.to_string(), v.to_vec()))
            })
            .collect(),
        ops: if analogy.ops.is_empty() {
            vec![Op::Add]
        } else {
            analogy.ops.clone()
        },
        result: ("Result".to_string(), analogy.result_vector(vectors)),
        similars: similars
            .iter()
            .filter_map(|(word, score)| {
                vectors
                    .vector_of(word)
                    .map(|v| (word.to_string(), v.to_vec(), *score))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordmath::analogy;

    #[test]
    fn payload_matches_the_renderer_contract() {
        let vectors = WordVectors::parse("a 1 0\nb 0 1\nc 1 1\n").unwrap();
        let analogy = analogy::parse("a - b").unwrap();
        let similars = vec![(Word::new("c"), 0.5f32)];

        let payload = build_payload(&analogy, &vectors, &similars);
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["inputs"], serde_json::json!([["a", [1.0, 0.0]], ["b", [0.0, 1.0]]]));
        assert_eq!(json["ops"], serde_json::json!(["sub"]));
        assert_eq!(json["result"], serde_json::json!(["Result", [1.0, -1.0]]));
        assert_eq!(json["similars"], serde_json::json!([["c", [1.0, 1.0], 0.5]]));
    }

    #[test]
    fn payload_defaults_to_a_single_add_op() {
        let vectors = WordVectors::parse("a 1 0\n").unwrap();
        let analogy = analogy::parse("a").unwrap();
        let payload = build_payload(&analogy, &vectors, &[]);
        assert_eq!(payload.ops, vec![Op::Add]);
    }
}
