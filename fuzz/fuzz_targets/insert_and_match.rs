#![no_main]
use libfuzzer_sys::fuzz_target;
use wildroute::Router;

fuzz_target!(|data: (Vec<(String, i32)>, String)| {
    let mut router = Router::new();

    for (route, value) in data.0 {
        let before = router.routes();
        if router.insert(route, value).is_err() {
            assert_eq!(router.routes(), before);
        }
    }

    let _ = router.at(&data.1);
});
