//! Stock bin-definition table.
//!
//! Bin rows are opaque to the pipeline — counted and re-emitted verbatim.
//! This is the default PASS/FAIL classification table shipped for callers
//! that supply no template of their own. Field layout:
//! `"ID","NAME","","lim","0","P/F",color,"tol","","Bool"`.

const DEFAULT_BINS: [&str; 25] = [
    r#""1","PASS","","0","0","PASS",65280,"0","0","False""#,
    r#""2","PASS","","0","0","PASS",65280,"0","0","False""#,
    r#""3","PASS","","0","0","PASS",65280,"0","0","False""#,
    r#""4","PASS","","0","0","PASS",65280,"0","0","False""#,
    r#""5","LEAKAGE 1","","","","FAIL",16777088,"","","False""#,
    r#""6","LEAKAGE 2","","","","FAIL",16711680,"","","False""#,
    r#""7","LEAKAGE 3","","","","FAIL",8404992,"","","False""#,
    r#""8","BREAKDOWN 1","","","","FAIL",22446,"","","False""#,
    r#""9","BREAKDOWN 2","","","","FAIL",232147,"","","False""#,
    r#""10","BREAKDOWN 3","","","","FAIL",128,"","","False""#,
    r#""11","SATURATION 1","","100","0","FAIL",65535,"10","","True""#,
    r#""12","HFE","","","","FAIL",4227327,"","","False""#,
    r#""13","OTHER VOLTAGE","","20","0","FAIL",8388736,"5","","True""#,
    r#""14","JUNCTION RES","","","","FAIL",16744703,"","","False""#,
    r#""15","OTHER CURRENT","","","","FAIL",7715583,"","","False""#,
    r#""16","SPARE","","","","FAIL",10551106,"","","False""#,
    r#""17","SPARE","","","","FAIL",16593349,"","","False""#,
    r#""18","SPARE","","","","FAIL",3831306,"","","False""#,
    r#""19","SPARE","","","","FAIL",8388863,"","","False""#,
    r#""20","SPARE","","","","FAIL",32896,"","","False""#,
    r#""21","KELVIN","","20","0","FAIL",2631835,"5","0","True""#,
    r#""22","CONTINUITY","","50","0","FAIL",255,"5","","True""#,
    r#""40","OPTICAL DEFECT","","","","FAIL",1052688,"","","False""#,
    r#""98","DPAT","","","","FAIL",14401252,"","","False""#,
    r#""99","GDBN","","","","FAIL",13145877,"","","False""#,
];

/// The default bin table as owned rows ready for a
/// [`crate::WaferMapDocument`].
pub fn default_bin_rows() -> Vec<String> {
    DEFAULT_BINS.iter().map(|s| s.to_string()).collect()
}

/// Parse a bin-template text body into rows: one bin per non-blank line,
/// surrounding whitespace trimmed.
pub fn parse_bin_template(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
