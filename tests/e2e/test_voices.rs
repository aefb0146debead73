use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_all_voices(ctx: &TestContext) {
    let response = ctx.client.get("/api/voices").await.unwrap();

    response.assert_status(StatusCode::OK);

    let voices = response.body.as_ref().unwrap().as_array().unwrap();
    assert_eq!(voices.len(), 20);
    assert_eq!(
        voices[0],
        json!({ "id": "es-ES-Standard-A", "gender": "FEMALE", "language_code": "es-ES" })
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_tag_every_voice_with_a_gender(ctx: &TestContext) {
    let response = ctx.client.get("/api/voices").await.unwrap();
    let voices = response.body.as_ref().unwrap().as_array().unwrap();

    for voice in voices {
        let gender = voice.get("gender").and_then(|g| g.as_str()).unwrap();
        assert!(gender == "FEMALE" || gender == "MALE", "unexpected gender {gender}");
        assert_eq!(voice.get("language_code").and_then(|l| l.as_str()), Some("es-ES"));
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_call_speech_service_when_listing(ctx: &TestContext) {
    ctx.client.get("/api/voices").await.unwrap();

    assert!(ctx.tts.calls().is_empty());
}
