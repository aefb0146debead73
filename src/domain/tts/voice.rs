use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    Female,
    Male,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Female => "FEMALE",
            VoiceGender::Male => "MALE",
        }
    }
}

/// A selectable narration voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub id: &'static str,
    pub gender: VoiceGender,
}

/// The only voices a render may ask for.
#[rustfmt::skip]
pub const VOICES: &[Voice] = &[
    Voice { id: "es-ES-Standard-A", gender: VoiceGender::Female },
    Voice { id: "es-ES-Standard-B", gender: VoiceGender::Male },
    Voice { id: "es-ES-Standard-C", gender: VoiceGender::Female },
    Voice { id: "es-ES-Standard-D", gender: VoiceGender::Female },
    Voice { id: "es-ES-Standard-E", gender: VoiceGender::Female },
    Voice { id: "es-ES-Standard-F", gender: VoiceGender::Male },
    Voice { id: "es-ES-Neural2-A", gender: VoiceGender::Female },
    Voice { id: "es-ES-Neural2-B", gender: VoiceGender::Male },
    Voice { id: "es-ES-Neural2-C", gender: VoiceGender::Female },
    Voice { id: "es-ES-Neural2-D", gender: VoiceGender::Female },
    Voice { id: "es-ES-Neural2-E", gender: VoiceGender::Female },
    Voice { id: "es-ES-Neural2-F", gender: VoiceGender::Male },
    Voice { id: "es-ES-Polyglot-1", gender: VoiceGender::Male },
    Voice { id: "es-ES-Studio-C", gender: VoiceGender::Female },
    Voice { id: "es-ES-Studio-F", gender: VoiceGender::Male },
    Voice { id: "es-ES-Wavenet-B", gender: VoiceGender::Male },
    Voice { id: "es-ES-Wavenet-C", gender: VoiceGender::Female },
    Voice { id: "es-ES-Wavenet-D", gender: VoiceGender::Female },
    Voice { id: "es-ES-Wavenet-E", gender: VoiceGender::Male },
    Voice { id: "es-ES-Wavenet-F", gender: VoiceGender::Female },
];

pub const DEFAULT_VOICE: &str = "es-ES-Standard-A";

impl Voice {
    pub fn find(id: &str) -> Option<&'static Voice> {
        VOICES.iter().find(|voice| voice.id == id)
    }

    /// BCP-47 code carried in the voice name, e.g. `es-ES` for `es-ES-Neural2-A`.
    pub fn language_code(&self) -> &'static str {
        let end = self
            .id
            .match_indices('-')
            .nth(1)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}
