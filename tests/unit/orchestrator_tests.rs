/*!
 * Tests for the translation pass
 */

use std::sync::Arc;

use layerlingo::app_config::{Config, FilterStrategy};
use layerlingo::errors::{MutationError, ProviderError, TranslationError, UserInputError};
use layerlingo::notify::{NotifyLevel, RecordingNotifier};
use layerlingo::providers::Credentials;
use layerlingo::providers::mock::MockTranslationClient;
use layerlingo::scene::memory::TextNode;
use layerlingo::scene::{MemoryScene, NodeId, Point, SceneTree};
use layerlingo::translation::{TranslateRequest, TranslationOrchestrator, TranslationOutcome};

use crate::common::{add_text, bold, hello_bonjour_scene, init_logger, styled};

fn request(target: &str) -> TranslateRequest {
    TranslateRequest::new(target, Credentials::new("test-key"))
}

/// Three loose text nodes, selected in order
fn three_node_scene() -> (MemoryScene, Vec<NodeId>) {
    let mut scene = MemoryScene::new();
    let ids = vec![
        add_text(&mut scene, "First", "one"),
        add_text(&mut scene, "Second", "two"),
        add_text(&mut scene, "Third", "three"),
    ];
    scene.select(ids.clone());
    (scene, ids)
}

fn text_of(scene: &MemoryScene, id: NodeId) -> String {
    scene.characters(id).unwrap_or_default()
}

/// Test that only text the provider detects outside the target is mutated
#[tokio::test]
async fn test_run_withProviderDetectedFilter_shouldMutateOnlyOtherLanguages() {
    init_logger();
    let (mut scene, ids) = three_node_scene();
    let client = MockTranslationClient::working()
        .with_detection("one", "EN")
        .with_detection("two", "FR")
        .with_detection("three", "EN");
    let orchestrator = TranslationOrchestrator::new(client);

    let outcome = orchestrator.run(&mut scene, &ids, &request("EN")).await;

    assert_eq!(outcome, TranslationOutcome::Completed { updated: 1, failures: vec![] });
    assert_eq!(text_of(&scene, ids[0]), "one");
    assert_eq!(text_of(&scene, ids[1]), "[EN] two");
    assert_eq!(text_of(&scene, ids[2]), "three");
}

/// Test that detected codes are compared without regard to case
#[tokio::test]
async fn test_run_withLowercaseDetection_shouldStillSkipTarget() {
    let (mut scene, ids) = three_node_scene();
    let client = MockTranslationClient::working()
        .with_detection("one", "fr")
        .with_detection("two", "fr")
        .with_detection("three", "FR");
    let orchestrator = TranslationOrchestrator::new(client);

    let outcome = orchestrator.run(&mut scene, &ids, &request("FR")).await;
    assert_eq!(outcome, TranslationOutcome::NoOpAlreadyTarget);
}

/// Test that surviving units receive the translation at their own batch index
#[tokio::test]
async fn test_run_withFilteredBatch_shouldReconcileByIndex() {
    let (mut scene, ids) = three_node_scene();
    let client = MockTranslationClient::working()
        .with_detection("one", "FR")
        .with_detection("two", "EN")
        .with_detection("three", "DE")
        .with_translation("one", "uno")
        .with_translation("two", "dos")
        .with_translation("three", "tres");
    let orchestrator = TranslationOrchestrator::new(client);

    let outcome = orchestrator.run(&mut scene, &ids, &request("EN")).await;

    assert_eq!(outcome.updated(), 2);
    assert_eq!(text_of(&scene, ids[0]), "uno");
    assert_eq!(text_of(&scene, ids[1]), "two");
    assert_eq!(text_of(&scene, ids[2]), "tres");
}

/// Test that a short response fails the whole batch
#[tokio::test]
async fn test_run_withShortResponse_shouldFailWithoutMutation() {
    let (mut scene, ids) = three_node_scene();
    let orchestrator = TranslationOrchestrator::new(MockTranslationClient::short());

    let outcome = orchestrator.run(&mut scene, &ids, &request("FR")).await;

    assert_eq!(
        outcome,
        TranslationOutcome::Failed(TranslationError::Provider(ProviderError::LengthMismatch {
            expected: 3,
            actual: 2,
        }))
    );
    assert_eq!(text_of(&scene, ids[0]), "one");
    assert_eq!(text_of(&scene, ids[1]), "two");
}

/// Test that an empty response is a provider error
#[tokio::test]
async fn test_run_withEmptyResponse_shouldFail() {
    let (mut scene, ids) = three_node_scene();
    let orchestrator = TranslationOrchestrator::new(MockTranslationClient::empty());

    let outcome = orchestrator.run(&mut scene, &ids, &request("FR")).await;

    assert_eq!(
        outcome,
        TranslationOutcome::Failed(TranslationError::Provider(ProviderError::EmptyResponse))
    );
}

/// Test that a provider failure is reported once and never retried
#[tokio::test]
async fn test_run_withFailingProvider_shouldFailWithoutRetry() {
    let (mut scene, ids) = three_node_scene();
    let notifier = Arc::new(RecordingNotifier::new());
    let orchestrator = TranslationOrchestrator::new(MockTranslationClient::failing())
        .with_notifier(notifier.clone());

    let outcome = orchestrator.run(&mut scene, &ids, &request("FR")).await;

    assert!(matches!(
        outcome,
        TranslationOutcome::Failed(TranslationError::Provider(ProviderError::ApiError {
            status_code: 500,
            ..
        }))
    ));
    assert_eq!(orchestrator.client().call_count(), 1);
    let errors = notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Simulated API failure"));
}

/// Test that a missing target is rejected before any network call
#[tokio::test]
async fn test_run_withMissingTarget_shouldFailWithUserInputError() {
    for target in ["", "  ", "auto", "AUTO"] {
        let (mut scene, ids) = three_node_scene();
        let notifier = Arc::new(RecordingNotifier::new());
        let orchestrator = TranslationOrchestrator::new(MockTranslationClient::working())
            .with_notifier(notifier.clone());

        let outcome = orchestrator.run(&mut scene, &ids, &request(target)).await;

        assert_eq!(
            outcome,
            TranslationOutcome::Failed(UserInputError::MissingTargetLanguage.into()),
            "target: {:?}",
            target
        );
        assert_eq!(orchestrator.client().call_count(), 0);
        assert_eq!(notifier.errors(), vec!["Please choose a valid target language".to_string()]);
    }
}

/// Test that a selection without text is rejected before any network call
#[tokio::test]
async fn test_run_withNoTextSelected_shouldFailWithEmptySelection() {
    let mut scene = MemoryScene::new();
    let shape = scene.add_shape("Shape");
    let frame = scene.add_frame("Empty", vec![shape]);
    let orchestrator = TranslationOrchestrator::new(MockTranslationClient::working());

    for roots in [vec![], vec![frame]] {
        let outcome = orchestrator.run(&mut scene, &roots, &request("FR")).await;
        assert_eq!(
            outcome,
            TranslationOutcome::Failed(TranslationError::UserInput(UserInputError::EmptySelection))
        );
    }
    assert_eq!(orchestrator.client().call_count(), 0);
}

/// Test that the whole selection is sent in one request with the given credentials
#[tokio::test]
async fn test_run_withSeveralNodes_shouldSendOneBatch() {
    let (mut scene, ids) = three_node_scene();
    let orchestrator = TranslationOrchestrator::new(MockTranslationClient::working());

    orchestrator.run(&mut scene, &ids, &request("DE")).await;

    let calls = orchestrator.client().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].texts, vec!["one", "two", "three"]);
    assert_eq!(calls[0].target_language, "DE");
    assert_eq!(calls[0].credentials, Credentials::new("test-key"));
}

/// Test that the local heuristic only sends text outside the target script
#[tokio::test]
async fn test_run_withLocalHeuristic_shouldPreFilterAndApplyAll() {
    let mut scene = MemoryScene::new();
    let english = add_text(&mut scene, "English", "Hello");
    let chinese = add_text(&mut scene, "Chinese", "你好");
    // The provider claims the text is already Chinese; nothing filters after the call
    let client = MockTranslationClient::working()
        .with_detection("Hello", "ZH")
        .with_translation("Hello", "你好");
    let orchestrator =
        TranslationOrchestrator::new(client).with_strategy(FilterStrategy::LocalHeuristic);

    let outcome = orchestrator.run(&mut scene, &[english, chinese], &request("ZH")).await;

    assert_eq!(outcome.updated(), 1);
    assert_eq!(orchestrator.client().calls()[0].texts, vec!["Hello"]);
    assert_eq!(text_of(&scene, english), "你好");
}

/// Test that the local heuristic stops before the network when nothing is left
#[tokio::test]
async fn test_run_withLocalHeuristicAndAllTarget_shouldNoOpWithoutCall() {
    let mut scene = MemoryScene::new();
    let first = add_text(&mut scene, "First", "안녕하세요");
    let second = add_text(&mut scene, "Second", "감사합니다");
    let notifier = Arc::new(RecordingNotifier::new());
    let orchestrator = TranslationOrchestrator::new(MockTranslationClient::working())
        .with_strategy(FilterStrategy::LocalHeuristic)
        .with_notifier(notifier.clone());

    let outcome = orchestrator.run(&mut scene, &[first, second], &request("KO")).await;

    assert_eq!(outcome, TranslationOutcome::NoOpAlreadyTarget);
    assert_eq!(orchestrator.client().call_count(), 0);
    assert_eq!(
        notifier.messages(),
        vec![(
            NotifyLevel::Info,
            "Selected text is already in Korean; nothing to translate.".to_string()
        )]
    );
}

/// Test that one node the host rejects does not stop the others
#[tokio::test]
async fn test_run_withUnloadableFontOnOneNode_shouldIsolateFailure() {
    let mut scene = MemoryScene::new();
    let first = add_text(&mut scene, "First", "one");
    let broken = scene.add_text("Broken", TextNode::new("two", styled(bold(), 12.0)), Point::default());
    let third = add_text(&mut scene, "Third", "three");
    scene.make_unavailable(bold());
    let notifier = Arc::new(RecordingNotifier::new());
    let client = MockTranslationClient::working()
        .with_detection("one", "EN")
        .with_detection("two", "EN")
        .with_detection("three", "EN");
    let orchestrator = TranslationOrchestrator::new(client).with_notifier(notifier.clone());

    let outcome = orchestrator
        .run(&mut scene, &[first, broken, third], &request("FR"))
        .await;

    match outcome {
        TranslationOutcome::Completed { updated, failures } => {
            assert_eq!(updated, 2);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].node, broken);
            assert!(matches!(failures[0].error, MutationError::FontLoad { .. }));
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(text_of(&scene, first), "[FR] one");
    assert_eq!(text_of(&scene, broken), "two");
    assert_eq!(text_of(&scene, third), "[FR] three");
    assert_eq!(notifier.errors(), vec!["1 nodes could not be updated.".to_string()]);
}

/// Test the progress notifications of a successful pass
#[tokio::test]
async fn test_run_withHelloBonjour_shouldNotifyStartAndCompletion() {
    let (mut scene, frame, _, _) = hello_bonjour_scene();
    let notifier = Arc::new(RecordingNotifier::new());
    let client = MockTranslationClient::working()
        .with_detection("Hello", "EN")
        .with_detection("Bonjour", "FR");
    let orchestrator = TranslationOrchestrator::new(client).with_notifier(notifier.clone());

    orchestrator.run(&mut scene, &[frame], &request("EN")).await;

    assert_eq!(
        notifier.messages(),
        vec![
            (NotifyLevel::Info, "Translating 2 text nodes...".to_string()),
            (NotifyLevel::Info, "Translation complete. 1 nodes updated.".to_string()),
        ]
    );
}

/// Test that annotate mode adds frames and keeps the source text
#[tokio::test]
async fn test_run_withAnnotateRequest_shouldCreateFramesInCollectionOrder() {
    let (mut scene, ids) = three_node_scene();
    let before = scene.nodes.len();
    let orchestrator = TranslationOrchestrator::new(MockTranslationClient::working());

    let outcome = orchestrator
        .run(&mut scene, &ids, &request("JA").annotate())
        .await;

    assert_eq!(outcome.updated(), 3);
    assert_eq!(text_of(&scene, ids[0]), "one");
    // One frame and one text node per source node
    assert_eq!(scene.nodes.len(), before + 6);
    let names: Vec<&str> = scene.nodes[before..]
        .iter()
        .filter(|node| node.name.starts_with("JA_"))
        .map(|node| node.name.as_str())
        .collect();
    assert_eq!(names, vec!["JA_First(one)", "JA_Second(two)", "JA_Third(three)"]);
}

/// Test that the config selects strategy and annotation styling
#[test]
fn test_fromConfig_withLocalStrategy_shouldUseIt() {
    let config = Config {
        filter_strategy: FilterStrategy::LocalHeuristic,
        ..Config::default()
    };
    let orchestrator = TranslationOrchestrator::from_config(MockTranslationClient::working(), &config);
    assert_eq!(orchestrator.strategy(), FilterStrategy::LocalHeuristic);
}
