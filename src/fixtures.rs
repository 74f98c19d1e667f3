//! Hand-made upstream responses shared by the tests.
//!
//! The codes here are made up, but laid out the way Comcigan does it.

use crate::comcigan::code::ComciganCodeSet;
use serde_json::{json, Value};

pub const BASE_URL: &str = "http://comci.test:4082";

/// The interesting bits of `/st`, with the noise around them cut away.
pub const BOOTSTRAP_PAGE: &str = r#"<html><head><script>
function sc_disp(sc){ sc_data('73629_',sc,1,'0'); }
function 표시(){
var 성명=자료.자료446[tn];
var 과목명=자료.자료492[sb];
갱신일=H시간표.자료147;
일일자료=Q자료(자료.자료481[학년][반]);
원자료=Q자료(자료.자료354[학년][반]);
}
$.ajax({url:'./36179?17384l'+sc});
</script></head></html>"#;

pub fn codes() -> ComciganCodeSet {
    ComciganCodeSet {
        path: "/36179?17384l".to_string(),
        code0: "73629".to_string(),
        code1: "446".to_string(),
        code2: "492".to_string(),
        code3: "147".to_string(),
        code4: "481".to_string(),
        code5: "354".to_string(),
    }
}

/// Search answer for one school, with the NUL Comcigan appends.
pub const SEARCH_ONE: &str =
    "{\"학교검색\":[[24966,\"서울\",\"한국고등학교\",12345]]}\u{0}";

/// Teachers: 1 김철수, 2 이영희, 3 박민수.
/// Subjects: 1 국어, 2 수학, 3 영어.
/// Codes are `subject * 1000 + teacher`.
///
/// Grade 1 has two classes. Class 1 had 수학/이영희 swapped for
/// 수학/김철수 on day 2 period 1, and lost day 2 period 3 entirely.
pub fn envelope() -> Value {
    json!({
        "지역명": "서울",
        "학년도": 2024,
        "시작일": "2024-03-04",
        "일과시간": ["1(09:00)", "2(09:50)", "3(10:40)"],
        "자료147": "2024-03-08 12:34:56",
        "자료446": ["*", "김철수", "이영희", "박민수"],
        "자료492": ["*", "국어", "수학", "영어"],
        "자료481": [
            0,
            [
                2,
                [2, [3, 1001, 2002, 3003], [2, 2001, 1001]],
                [1, [1, 0]]
            ]
        ],
        "자료354": [
            0,
            [
                2,
                [2, [3, 1001, 2002, 3003], [3, 2002, 1001, 3003]],
                [1, [1, 0]]
            ]
        ],
        "담임": [[1, 2, 0, 3], [3, 255, 1]]
    })
}
