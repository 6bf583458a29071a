use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IMultiSend {
        /// @notice Executes the packed batch
        /// @param transactions operation (1) | to (20) | value (32) | data length (32) | data
        function multiSend(bytes memory transactions) external payable;
    }
}
