use gacha_core::HistoryCatalog;
use serde_json::json;

pub fn catalog() -> HistoryCatalog {
    let histories = json!({
        "301": [
            {"time": ["2020-09-28 10:00:00", "2020-10-18 17:59:59"], "items": {"up": ["1022", "1014", "1023", "1031"]}},
            {"time": ["2020-10-20 18:00:00", "2020-11-10 15:59:59"], "items": {"up": ["1029", "1025", "1034", "1031"]}}
        ],
        "302": [
            {"time": ["2020-09-28 10:00:00", "2020-10-18 17:59:59"], "items": {"up": ["15502", "11502", "11402", "12402", "13407", "14402", "15402"]}}
        ]
    });
    let items = json!({
        "1014": {"zh-cn": "砂糖", "en-us": "Sucrose"},
        "1022": {"zh-cn": "温迪", "en-us": "Venti"},
        "1023": {"zh-cn": "香菱", "en-us": "Xiangling"},
        "1025": {"zh-cn": "行秋", "en-us": "Xingqiu"},
        "1029": {"zh-cn": "可莉", "en-us": "Klee"},
        "1031": {"zh-cn": "菲谢尔", "en-us": "Fischl"},
        "1034": {"zh-cn": "诺艾尔", "en-us": "Noelle"},
        "11402": {"zh-cn": "笛剑", "en-us": "The Flute"},
        "11502": {"zh-cn": "风鹰剑", "en-us": "Aquila Favonia"},
        "12402": {"zh-cn": "钟剑", "en-us": "The Bell"},
        "13407": {"zh-cn": "西风长枪", "en-us": "Favonius Lance"},
        "14402": {"zh-cn": "流浪乐章", "en-us": "The Widsith"},
        "15402": {"zh-cn": "绝弦", "en-us": "The Stringless"},
        "15502": {"zh-cn": "阿莫斯之弓", "en-us": "Amos' Bow"}
    });
    HistoryCatalog::from_json(&histories, &items)
}
