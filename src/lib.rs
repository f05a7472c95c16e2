pub mod shared {
    pub mod infrastructure {
        pub mod data_access;
        pub mod mail_outbox;
    }
}

pub mod modules {
    pub mod security {
        pub mod core {
            pub mod claims;
            pub mod identity;
            pub mod policy;
        }
        pub mod use_cases {
            pub mod verify_token {
                pub mod verifier;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod authorize_operation {
                pub mod guard;
            }
        }
    }
    pub mod services {
        pub mod email_service;
        pub mod identity_service;
        pub mod repository;
    }
    pub mod system {
        pub mod errors;
        pub mod use_cases {
            pub mod describe_viewer {
                pub mod inbound {
                    pub mod graphql;
                }
            }
            pub mod request_password_reset {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                }
            }
        }
    }
}

pub mod shell;
