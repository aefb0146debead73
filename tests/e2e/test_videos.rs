use crate::e2e::helpers;

use helpers::fakes::{EncodedClip, TtsBehavior};
use helpers::{TestContext, SEGMENT_SECONDS};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use textreel_backend::domain::video::EntryKind;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_render_single_segment_with_promo(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({
                "text": "Hola mundo. Esto es una prueba.",
                "output_name": "hola",
                "voice": "es-ES-Standard-A"
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_success_flag(true);
    assert_eq!(response.field("segment_count"), &json!(1));
    assert_eq!(response.field("duration_seconds"), &json!(SEGMENT_SECONDS + 5.0));

    let output = ctx.output_dir.join("hola.mp4");
    assert_eq!(
        response.field("output_path").as_str(),
        Some(output.to_string_lossy().as_ref())
    );
    assert!(output.exists());

    assert_eq!(
        ctx.tts.calls(),
        vec![(
            "Hola mundo. Esto es una prueba.".to_string(),
            "es-ES-Standard-A".to_string()
        )]
    );

    let runs = ctx.encoder.runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(
        runs[0].1,
        vec![
            EncodedClip {
                kind: EntryKind::Speech { segment_index: 1 },
                start: 0.0,
                duration: SEGMENT_SECONDS,
                has_audio: true,
            },
            EncodedClip {
                kind: EntryKind::Promotional,
                start: SEGMENT_SECONDS,
                duration: 5.0,
                has_audio: false,
            },
        ]
    );
    assert_eq!(ctx.leftover_audio(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_promo_when_disabled(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({
                "text": "Solo narración.",
                "output_name": "sin_promo",
                "voice": "es-ES-Neural2-F",
                "include_promo": false
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("duration_seconds"), &json!(SEGMENT_SECONDS));

    let runs = ctx.encoder.runs();
    assert_eq!(runs[0].1.len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_truncate_to_duration_cap(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({
                "text": "Hola mundo.",
                "output_name": "corto",
                "voice": "es-ES-Standard-A",
                "max_duration_seconds": 3.0
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("duration_seconds"), &json!(3.0));
    assert!(response
        .field("message")
        .as_str()
        .unwrap()
        .contains("truncated"));

    let clips = &ctx.encoder.runs()[0].1;
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[1].duration, 1.0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text_without_synthesis(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({ "text": "   ", "output_name": "vacio", "voice": "es-ES-Standard-A" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_success_flag(false)
        .assert_error_message("nothing to render");
    assert!(ctx.tts.calls().is_empty());
    assert!(ctx.encoder.runs().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_voice_before_synthesis(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({ "text": "Hola.", "output_name": "voz", "voice": "en-US-Wavenet-A" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_success_flag(false)
        .assert_error_message("unknown voice");
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_style(ctx: &TestContext) {
    let cases = [
        json!({ "font_size": 5 }),
        json!({ "background_color": "not-a-color" }),
        json!({ "text_color": "#12345" }),
        json!({ "max_duration_seconds": -1.0 }),
    ];

    for extra in cases {
        let mut body = json!({
            "text": "Hola.",
            "output_name": "estilo",
            "voice": "es-ES-Standard-A"
        });
        for (key, value) in extra.as_object().unwrap() {
            body[key] = value.clone();
        }

        let response = ctx.client.post("/api/videos", &body).await.unwrap();
        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_success_flag(false);
    }
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_output_names_with_paths(ctx: &TestContext) {
    for name in ["../escape", "a/b", "", "video.mp4"] {
        let response = ctx
            .client
            .post(
                "/api/videos",
                &json!({ "text": "Hola.", "output_name": name, "voice": "es-ES-Standard-A" }),
            )
            .await
            .unwrap();

        response.assert_status(StatusCode::BAD_REQUEST);
    }
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_exhausted_retries_as_bad_gateway(ctx: &TestContext) {
    ctx.tts.set_behavior(TtsBehavior::RateLimited);

    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({ "text": "Hola.", "output_name": "cuota", "voice": "es-ES-Standard-A" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_success_flag(false)
        .assert_error_message("4 attempts");
    assert_eq!(ctx.tts.calls().len(), 4);
    assert!(ctx.encoder.runs().is_empty());
    assert!(!ctx.output_dir.join("cuota.mp4").exists());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_retry_fatal_speech_errors(ctx: &TestContext) {
    ctx.tts.set_behavior(TtsBehavior::Broken);

    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({ "text": "Hola.", "output_name": "roto", "voice": "es-ES-Standard-A" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(ctx.tts.calls().len(), 1);
    assert_eq!(ctx.leftover_audio(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_encoding_failures(ctx: &TestContext) {
    ctx.encoder.fail_next();

    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({ "text": "Hola.", "output_name": "fallo", "voice": "es-ES-Standard-A" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_success_flag(false)
        .assert_error_message("encoding failed")
        .assert_error_message("Invalid data found when processing input");
    assert!(!ctx.output_dir.join("fallo.mp4").exists());
    assert_eq!(ctx.leftover_audio(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_split_long_text_into_ordered_segments(ctx: &TestContext) {
    let sentence = "Esta frase tiene exactamente cincuenta caracteres!";
    let text = std::iter::repeat(format!("{sentence}."))
        .take(8)
        .collect::<Vec<_>>()
        .join(" ");

    let response = ctx
        .client
        .post(
            "/api/videos",
            &json!({
                "text": text,
                "output_name": "largo",
                "voice": "es-ES-Wavenet-C",
                "include_promo": false
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let calls = ctx.tts.calls();
    assert!(calls.len() > 1);
    assert!(calls.iter().all(|(text, _)| text.chars().count() <= 300));

    let clips = &ctx.encoder.runs()[0].1;
    let starts: Vec<f64> = clips.iter().map(|c| c.start).collect();
    let expected: Vec<f64> = (0..clips.len()).map(|i| i as f64 * SEGMENT_SECONDS).collect();
    assert_eq!(starts, expected);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/api/videos", "{\"text\": \"Hola.\"")
        .await
        .unwrap();

    assert!(response.status.is_client_error());
    assert!(ctx.tts.calls().is_empty());
}
