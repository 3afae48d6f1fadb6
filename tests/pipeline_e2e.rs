//! End-to-end pipeline test over one fund group with mixed per-fund
//! outcomes: one clean page, one structurally broken page, one network
//! failure. Everything runs offline — pages are seeded into the cache and
//! the client points at an endpoint that refuses connections.

use std::fs;
use std::path::Path;

use fund_report::data::cache::PageCache;
use fund_report::data::eastmoney::DetailClient;
use fund_report::domain::{FundEntry, FundGroupConfig};
use fund_report::io::read_scraped_file;
use fund_report::{fetch, merge, report};

fn entry(code: &str, display_name: &str, source_name: &str) -> FundEntry {
    FundEntry {
        code: code.to_string(),
        display_name: display_name.to_string(),
        source_name: source_name.to_string(),
    }
}

fn valid_page(name: &str, code: &str) -> String {
    format!(
        "<html><body>\
         <div class=\"fundDetail-tit\"><div>{name}<span>({code})</span></div></div>\
         <dl class=\"dataItem01\"><dd>近1年：<span>12.34%</span></dd></dl>\
         <dl class=\"dataItem02\"><dd>近3年：<span>58.01%</span></dd></dl>\
         <div class=\"infoOfFund\"><table><tr>\
         <td>规模：12.97亿元（2024-03-31）</td>\
         <td class=\"specialData\">跟踪误差：0.52%</td>\
         </tr></table></div>\
         </body></html>"
    )
}

fn group(dir: &Path) -> FundGroupConfig {
    FundGroupConfig {
        id: "nasdaq".to_string(),
        report_title: "纳斯达克100基金数据每日报告".to_string(),
        entries: vec![
            entry("017436", "华宝纳斯达克精选股票(QDII)A", "华宝纳斯达克精选股票发起式(QDII)A"),
            entry("270042", "广发纳斯达克100ETF联接(QDII)A", "广发纳斯达克100ETF联接人民币(QDII)A"),
            entry("018043", "天弘纳斯达克100指数(QDII)A", "天弘纳斯达克100指数发起(QDII)A"),
        ],
        scraped_file: dir.join("nasdaq_scraped_details.tsv"),
        master_file: dir.join("nasdaq_fund_data.tsv"),
        report_file: dir.join("nasdaq_report.html"),
    }
}

const MASTER: &str = "名称\t一年涨幅(%)\t三年涨幅(%)\t规模(亿元)\t买入费率(%)\t零成本持有天数\n\
                      华宝纳斯达克精选股票(QDII)A\t0\t0\t0\t0.15\t7\n\
                      广发纳斯达克100ETF联接(QDII)A\t8.88%\t38.00%\t5.00亿元\t0.12\t7\n\
                      天弘纳斯达克100指数(QDII)A\t7.77%\t37.00%\t4.00亿元\t0.10\t30\n\
                      华宝纳斯达克精选股票(QDII)C\t9.99%\t39.00%\t3.00亿元\t0\t7\n";

#[test]
fn mixed_outcome_group_flows_through_all_three_stages() {
    let dir = tempfile::tempdir().unwrap();
    let group = group(dir.path());

    let cache = PageCache::new(dir.path().join("cache"));
    cache
        .store("017436", &valid_page("华宝纳斯达克精选股票发起式(QDII)A", "017436"))
        .unwrap();
    // Title container missing entirely: structural failure.
    cache
        .store("270042", "<html><body><p>系统维护中，请稍后再试</p></body></html>")
        .unwrap();
    // 018043 has no cache entry; the endpoint below refuses connections.
    let client = DetailClient::new("http://127.0.0.1:1").unwrap();

    fs::write(&group.master_file, MASTER).unwrap();

    // --- fetch ---
    fetch::run(&group, &client, &cache).unwrap();

    let records = read_scraped_file(&group.scraped_file).unwrap();
    assert_eq!(records.len(), 3);

    assert!(records[0].is_clean());
    assert_eq!(records[0].name, "华宝纳斯达克精选股票发起式(QDII)A");
    assert_eq!(records[0].one_year, "12.34%");
    assert_eq!(records[0].three_year, "58.01%");

    let broken = records[1].error.as_deref().unwrap();
    let offline = records[2].error.as_deref().unwrap();
    assert!(broken.starts_with("抓取失败: "));
    assert!(offline.starts_with("网络错误: "));
    assert_ne!(broken, offline);

    // --- merge ---
    let before: Vec<String> =
        fs::read_to_string(&group.master_file).unwrap().lines().map(String::from).collect();

    merge::run(&group).unwrap();

    let after: Vec<String> =
        fs::read_to_string(&group.master_file).unwrap().lines().map(String::from).collect();
    assert_eq!(before.len(), after.len());

    // Only the clean fund's row changed; every other line is byte-identical,
    // including the untracked C share class.
    for (b, a) in before.iter().zip(&after) {
        if b.starts_with("华宝纳斯达克精选股票(QDII)A\t") {
            assert_eq!(
                a,
                "华宝纳斯达克精选股票(QDII)A\t12.34%\t58.01%\t12.97亿元（2024-03-31）\t0.15\t7"
            );
        } else {
            assert_eq!(a, b);
        }
    }

    // Merging the same scraped file again is a no-op.
    merge::run(&group).unwrap();
    assert_eq!(
        fs::read_to_string(&group.master_file).unwrap().lines().collect::<Vec<_>>(),
        after.iter().map(String::as_str).collect::<Vec<_>>()
    );

    // --- report ---
    report::run(&group).unwrap();

    let html = fs::read_to_string(&group.report_file).unwrap();
    assert!(html.contains("<title>纳斯达克100基金数据每日报告</title>"));

    // Every master row renders, updated or not.
    assert!(html.contains("华宝纳斯达克精选股票(QDII)A"));
    assert!(html.contains("广发纳斯达克100ETF联接(QDII)A"));
    assert!(html.contains("天弘纳斯达克100指数(QDII)A"));
    assert!(html.contains("华宝纳斯达克精选股票(QDII)C"));

    // Display transforms: size annotation dropped, fee percent appended,
    // headers renamed.
    assert!(html.contains("<td>12.97亿元</td>"));
    assert!(!html.contains("12.97亿元（2024-03-31）"));
    assert!(html.contains("<td>0.15%</td>"));
    assert!(html.contains("<th>一年涨幅</th>"));
    assert!(html.contains("<th>天数</th>"));
}

#[test]
fn merge_without_scraped_file_leaves_master_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let group = group(dir.path());
    fs::write(&group.master_file, MASTER).unwrap();

    let err = merge::run(&group).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert_eq!(fs::read_to_string(&group.master_file).unwrap(), MASTER);
}

#[test]
fn report_without_master_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let group = group(dir.path());
    let err = report::run(&group).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(!group.report_file.exists());
}
