/// Test fixtures: representative gage detail pages from the FWS site.
///
/// These fixtures are trimmed to the rainfall table the parser reads. The
/// FWS gage view renders one `<tr>` per increment inside
/// `#gageDataTable`:
///   td[0] — observation time, "MM/DD/YYYY hh:mm AM" for interval views
///           or "MM/DD/YYYY" for daily views
///   td[1] — incremental rainfall in inches, sometimes with a `"` suffix
///
/// All dates sit around the 2026-10-09 .. 2026-10-16 reporting window.

/// Interval view. Rows at 10/08 and 10/16 09:00 fall outside the window;
/// the in-window total is 1.64 inches.
pub(crate) fn fixture_timed_rows_html() -> &'static str {
    r#"<!DOCTYPE html>
<html>
  <head><title>Cole Creek @ Deihl Road - Harris County FWS</title></head>
  <body>
    <h2>Gage 590 Cole Creek @ Deihl Road</h2>
    <table id="gageDataTable" class="table">
      <thead>
        <tr><th>Date/Time</th><th>Rainfall (in)</th></tr>
      </thead>
      <tbody>
        <tr><td>10/08/2026 11:00 PM</td><td>0.75</td></tr>
        <tr><td>10/10/2026 06:00 PM</td><td>0.52</td></tr>
        <tr><td>
              10/12/2026 03:15 AM
            </td><td> 1.04 </td></tr>
        <tr><td>10/16/2026 12:00 AM</td><td>0.08</td></tr>
        <tr><td>10/16/2026 09:00 AM</td><td>0.40</td></tr>
      </tbody>
    </table>
  </body>
</html>"#
}

/// Daily view with a header row inside tbody, a missing-data marker and
/// unit suffixes. Days 10/09 through 10/15 total 2.35 inches; 10/16 is
/// today and must be excluded.
pub(crate) fn fixture_daily_rows_html() -> &'static str {
    r#"<html><body>
    <table id="gageDataTable">
      <tbody>
        <tr><td>Date</td><td>Rainfall</td></tr>
        <tr><td>10/09/2026</td><td>0.00"</td></tr>
        <tr><td>10/10/2026</td><td>1.10"</td></tr>
        <tr><td>10/11/2026</td><td>--</td></tr>
        <tr><td>10/12/2026</td><td>0.85 in</td></tr>
        <tr><td>10/13/2026</td><td>0.00</td></tr>
        <tr><td>10/14/2026</td><td>0.36</td></tr>
        <tr><td>10/15/2026</td><td>0.04</td></tr>
        <tr><td>10/16/2026</td><td>0.90</td></tr>
      </tbody>
    </table>
    </body></html>"#
}

/// Gage page rendered without a rainfall table (e.g. a stage-only gage).
pub(crate) fn fixture_no_data_html() -> &'static str {
    r#"<html><body>
    <h2>Gage 999</h2>
    <p>No rainfall data is available for the selected period.</p>
    </body></html>"#
}
