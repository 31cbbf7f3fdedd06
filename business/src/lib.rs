pub mod application {
    pub mod cart {
        pub mod store;
    }
    pub mod order {
        pub mod place_order;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod cart {
        pub mod errors;
        pub mod listener;
        pub mod model;
        pub mod money;
        pub mod storage;
    }
    pub mod order {
        pub mod errors;
        pub mod gateway;
        pub mod model;
        pub mod use_cases {
            pub mod place_order;
        }
    }
}
