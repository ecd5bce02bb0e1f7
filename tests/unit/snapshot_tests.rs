/*!
 * Tests for style capture and replay
 */

use layerlingo::scene::memory::TextNode;
use layerlingo::scene::{
    FontLoader, HorizontalAlign, MemoryScene, Mixed, Point, SceneTree, StyledText,
};
use layerlingo::translation::StyleSnapshot;

use crate::common::{bold, red, regular, styled};

fn two_run_scene() -> (MemoryScene, layerlingo::scene::NodeId) {
    let mut scene = MemoryScene::new();
    let text = TextNode::from_spans(&[("Bold", styled(bold(), 20.0)), ("Plain", styled(regular(), 14.0))]);
    let id = scene.add_text("Mixed", text, Point::default());
    (scene, id)
}

/// Test that a uniform node is captured as one bundle with its alignment
#[test]
fn test_capture_withUniformText_shouldReturnUniform() {
    let mut scene = MemoryScene::new();
    let mut text = TextNode::new("Hello", red(bold(), 18.0));
    text.alignment.horizontal = HorizontalAlign::Center;
    let id = scene.add_text("Title", text, Point::default());

    let snapshot = StyleSnapshot::capture(&scene, id).unwrap();

    match &snapshot {
        StyleSnapshot::Uniform { style, alignment } => {
            assert_eq!(style.font_name, Mixed::Uniform(bold()));
            assert_eq!(style.font_size, Mixed::Uniform(18.0));
            assert_eq!(alignment.horizontal, HorizontalAlign::Center);
        }
        other => panic!("expected uniform snapshot, got {:?}", other),
    }
    assert_eq!(snapshot.fonts(), vec![bold()]);
}

/// Test that captured runs only hold uniform attributes
#[test]
fn test_capture_withAlternatingStyles_shouldNeverStoreVariesInRuns() {
    let mut scene = MemoryScene::new();
    let text = TextNode::from_spans(&[
        ("a", styled(bold(), 12.0)),
        ("b", red(regular(), 12.0)),
        ("cd", styled(bold(), 16.0)),
        ("e", styled(regular(), 16.0)),
    ]);
    let id = scene.add_text("Alternating", text, Point::default());

    let snapshot = StyleSnapshot::capture(&scene, id).unwrap();

    match &snapshot {
        StyleSnapshot::Runs { runs, .. } => {
            assert_eq!(runs.len(), 4);
            assert_eq!(runs[2].range, 2..4);
            assert!(runs.iter().all(|run| run.style.is_uniform()));
        }
        other => panic!("expected runs, got {:?}", other),
    }
}

/// Test that differing runs are captured as contiguous runs
#[test]
fn test_capture_withTwoRuns_shouldReturnContiguousRuns() {
    let (scene, id) = two_run_scene();

    let snapshot = StyleSnapshot::capture(&scene, id).unwrap();

    match &snapshot {
        StyleSnapshot::Runs { original_len, runs } => {
            assert_eq!(*original_len, 9);
            assert_eq!(runs.len(), 2);
            assert_eq!(runs[0].range, 0..4);
            assert_eq!(runs[1].range, 4..9);
            assert_eq!(runs[0].style.font_name, Mixed::Uniform(bold()));
            assert_eq!(runs[1].style.font_size, Mixed::Uniform(14.0));
        }
        other => panic!("expected runs, got {:?}", other),
    }
    assert!(!snapshot.is_uniform());
    // Sorted and deduplicated
    assert_eq!(snapshot.fonts(), vec![bold(), regular()]);
}

/// Test that runs are clipped to the shorter of old and new text
#[tokio::test]
async fn test_apply_withShorterText_shouldClipRuns() {
    let (mut scene, id) = two_run_scene();
    let snapshot = StyleSnapshot::capture(&scene, id).unwrap();

    for font in snapshot.fonts() {
        scene.load_font(&font).await.unwrap();
    }
    scene.set_characters(id, "Abcdef").unwrap();
    snapshot.apply(&mut scene, id, 6).unwrap();

    let text = scene.text_node(id).unwrap();
    assert_eq!(scene.characters(id).as_deref(), Some("Abcdef"));
    assert!(text.styles()[..4].iter().all(|s| s.font_name == bold() && s.font_size == 20.0));
    assert!(text.styles()[4..].iter().all(|s| s.font_name == regular() && s.font_size == 14.0));
}

/// Test that characters past the original length keep the host style
#[tokio::test]
async fn test_apply_withLongerText_shouldLeaveTailUntouched() {
    let (mut scene, id) = two_run_scene();
    let snapshot = StyleSnapshot::capture(&scene, id).unwrap();

    for font in snapshot.fonts() {
        scene.load_font(&font).await.unwrap();
    }
    // New characters take the first character's style
    scene.set_characters(id, "BoldPlainTail").unwrap();
    snapshot.apply(&mut scene, id, 13).unwrap();

    let styles = scene.text_node(id).unwrap().styles();
    assert_eq!(styles[8].font_name, regular());
    assert!(styles[9..].iter().all(|s| s.font_name == bold() && s.font_size == 20.0));
}

/// Test that a uniform snapshot on empty new text only restores alignment
#[tokio::test]
async fn test_apply_withEmptyNewText_shouldSucceed() {
    let mut scene = MemoryScene::new();
    let id = scene.add_text("Title", TextNode::new("Hi", styled(regular(), 12.0)), Point::default());
    let snapshot = StyleSnapshot::capture(&scene, id).unwrap();

    scene.load_font(&regular()).await.unwrap();
    scene.set_characters(id, "").unwrap();
    assert!(snapshot.apply(&mut scene, id, 0).is_ok());
    assert_eq!(scene.characters(id).as_deref(), Some(""));
}
