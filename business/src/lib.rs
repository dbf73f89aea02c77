pub mod application {
    pub mod card {
        pub mod capture_session;
        pub mod pending_request;
        pub mod read_card_image;
        pub mod recognize_card;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod card {
        pub mod errors;
        pub mod extraction;
        pub mod language;
        pub mod model;
        pub mod services;
        pub mod use_cases {
            pub mod read_card_image;
            pub mod recognize_card;
        }
    }
}
