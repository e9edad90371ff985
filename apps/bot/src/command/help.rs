use super::ReplyPayload;

pub(super) fn usage() -> ReplyPayload {
    ReplyPayload::text(
        "/daily: fetches the daily open, close, high, low and volume for a company listed on the NSE\n\
         e.g. <pre>/daily IDFC</pre>\n\n\
         /graph: fetches the intraday (1 min) price graph for a company listed on the NSE\n\
         e.g. <pre>/graph IDFC</pre>\n\n\
         /crypto: fetches the intraday price graph and daily summary for a cryptocurrency\n\
         e.g. <pre>/crypto BTC</pre>",
    )
}
