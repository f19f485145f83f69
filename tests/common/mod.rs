#[allow(dead_code)]
#[path = "../../src/core/testing.rs"]
mod fixture;

use fixture::build_pdf;

pub fn dream_speech_pdf() -> Vec<u8> {
    build_pdf(
        &[
            &[
                "Property of AmericanRhetoric.com",
                "I have a dream that one day this nation will rise up",
                "I have a dream today",
            ],
            &[
                "Let freedom ring from the mighty mountains of New York",
                "Let freedom ring from every hill and molehill",
            ],
            &["Free at last free at last", "AmericanRhetoric.com"],
        ],
        &[
            ("Title", "I Have a Dream"),
            ("Author", "Martin Luther King, Jr."),
            ("Keywords", "civil rights, freedom"),
        ],
    )
}
